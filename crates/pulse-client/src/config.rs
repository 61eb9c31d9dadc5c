use dotenv::var;
use std::time::Duration;

pub const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const FMP_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Seconds between automatic refresh cycles.
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// Statically defined watchlists.
pub const CRYPTO_IDS: [&str; 4] = ["bitcoin", "ethereum", "solana", "cardano"];
pub const STOCK_SYMBOLS: [&str; 4] = ["AAPL", "TSLA", "MSFT", "AMZN"];

/// Length of the detail chart window, in days.
pub const CHART_DAYS: u32 = 7;

/// Runtime settings shared by the poller and the one-shot commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub coingecko_url: String,
    pub fmp_url: String,
    pub fmp_api_key: Option<String>,
    pub user_agent: Option<String>,
    pub currency: String,
    pub crypto_ids: Vec<String>,
    pub stock_symbols: Vec<String>,
    pub interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coingecko_url: COINGECKO_URL.to_string(),
            fmp_url: FMP_URL.to_string(),
            fmp_api_key: None,
            user_agent: None,
            currency: "usd".to_string(),
            crypto_ids: CRYPTO_IDS.iter().map(|id| id.to_string()).collect(),
            stock_symbols: STOCK_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
        }
    }
}

impl Config {
    /// Defaults, overlaid with whatever the environment (or `.env`) provides.
    ///
    /// Empty variables count as unset, so `FMP_API_KEY=` leaves the key off the URL.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_empty("COINGECKO_URL") {
            config.coingecko_url = url;
        }
        if let Some(url) = non_empty("FMP_URL") {
            config.fmp_url = url;
        }
        config.fmp_api_key = non_empty("FMP_API_KEY");
        config.user_agent = non_empty("PULSE_USER_AGENT");
        config
    }

    pub fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&ids={}&order=market_cap_desc&sparkline=true&price_change_percentage=24h",
            self.coingecko_url.trim_end_matches('/'),
            self.currency,
            self.crypto_ids.join(","),
        )
    }

    pub fn quotes_url(&self) -> String {
        let base = format!(
            "{}/quote-short/{}",
            self.fmp_url.trim_end_matches('/'),
            self.stock_symbols.join(","),
        );
        match &self.fmp_api_key {
            Some(key) => format!("{base}?apikey={key}"),
            None => base,
        }
    }

    pub fn chart_url(&self, id: &str) -> String {
        format!(
            "{}/coins/{id}/market_chart?vs_currency={}&days={CHART_DAYS}&interval=daily",
            self.coingecko_url.trim_end_matches('/'),
            self.currency,
        )
    }
}

fn non_empty(key: &str) -> Option<String> {
    var(key).ok().filter(|value| !value.trim().is_empty())
}
