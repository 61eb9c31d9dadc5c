use chrono::{DateTime, Local};
use pulse_client::prelude::*;
use tracing::{debug, trace};

/// Outcome of the most recent refresh of one list.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeedStatus {
    /// Time of the last successful fetch.
    pub updated: Option<DateTime<Local>>,
    /// Set while the latest attempt has failed; the list still shows older data.
    pub error: Option<String>,
}

impl FeedStatus {
    pub fn is_stale(&self) -> bool {
        self.error.is_some()
    }

    fn succeeded(&mut self, now: DateTime<Local>) {
        self.updated = Some(now);
        self.error = None;
    }

    fn failed(&mut self, error: &FetchError) {
        self.error = Some(error.to_string());
    }
}

/// Everything the dashboard displays. Owned by the UI loop; the poller only
/// reaches it through [`Update`] messages.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub cryptos: Vec<AssetQuote>,
    pub stocks: Vec<StockQuote>,
    pub selected: Option<AssetQuote>,
    pub series: Vec<PricePoint>,
    /// A chart reply for the current selection has landed, even if it was empty.
    pub chart_loaded: bool,
    pub chart_error: Option<String>,
    pub cursor: usize,
    pub crypto_status: FeedStatus,
    pub stock_status: FeedStatus,
    generation: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, update: Update) {
        self.apply_at(update, Local::now());
    }

    /// Fold one fetch result into the display state. Successful list fetches
    /// replace the whole list; failures leave it alone and mark it stale.
    pub fn apply_at(&mut self, update: Update, now: DateTime<Local>) {
        match update {
            Update::Markets(Ok(cryptos)) => {
                trace!("replacing {} crypto rows with {}", self.cryptos.len(), cryptos.len());
                self.cryptos = cryptos;
                self.cursor = self.cursor.min(self.cryptos.len().saturating_sub(1));
                self.crypto_status.succeeded(now);
            }
            Update::Markets(Err(e)) => self.crypto_status.failed(&e),
            Update::Quotes(Ok(stocks)) => {
                trace!("replacing {} stock rows with {}", self.stocks.len(), stocks.len());
                self.stocks = stocks;
                self.stock_status.succeeded(now);
            }
            Update::Quotes(Err(e)) => self.stock_status.failed(&e),
            Update::Chart {
                generation,
                id,
                series,
            } => {
                if generation != self.generation || self.selected.is_none() {
                    debug!("[{id}] discarding chart for an earlier selection");
                    return;
                }
                match series {
                    Ok(series) => {
                        self.series = series;
                        self.chart_loaded = true;
                    }
                    Err(e) => self.chart_error = Some(e.to_string()),
                }
            }
        }
    }

    /// Open the detail overlay for the crypto row at `index`. Returns the
    /// asset id and the generation the chart fetch must echo back.
    pub fn select(&mut self, index: usize) -> Option<(String, u64)> {
        let asset = self.cryptos.get(index)?.clone();
        self.cursor = index;
        self.generation += 1;
        self.series.clear();
        self.chart_loaded = false;
        self.chart_error = None;
        let id = asset.id.clone();
        self.selected = Some(asset);
        Some((id, self.generation))
    }

    pub fn select_current(&mut self) -> Option<(String, u64)> {
        self.select(self.cursor)
    }

    /// Close the overlay. Any chart still in flight is ignored when it lands.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.series.clear();
        self.chart_loaded = false;
        self.chart_error = None;
    }

    pub fn is_loading_chart(&self) -> bool {
        self.selected.is_some() && !self.chart_loaded && self.chart_error.is_none()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.cryptos.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.cryptos.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn asset(id: &str, price: f64) -> AssetQuote {
        AssetQuote {
            id: id.into(),
            symbol: id[..3].into(),
            name: id.to_uppercase(),
            image: String::new(),
            current_price: Some(price),
            price_change_percentage_24h: None,
        }
    }

    fn stock(symbol: &str, price: f64) -> StockQuote {
        StockQuote {
            symbol: symbol.into(),
            price: Some(price),
            volume: None,
        }
    }

    fn point(price: f64) -> PricePoint {
        PricePoint {
            time: chrono::DateTime::from_timestamp(1_711_843_200, 0).unwrap(),
            price,
        }
    }

    fn failure() -> FetchError {
        FetchError::Api {
            url: "https://example.test".into(),
            message: "Limit Reach".into(),
        }
    }

    fn now() -> DateTime<Local> {
        Local.timestamp_opt(1_711_843_200, 0).unwrap()
    }

    #[test]
    fn mock_payloads_pass_through_unchanged() {
        let markets: Vec<AssetQuote> = serde_json::from_str(
            r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin","image":"https://img/btc.png",
                 "current_price":67012.5,"price_change_percentage_24h":-1.2345}]"#,
        )
        .unwrap();
        let quotes: Vec<StockQuote> =
            serde_json::from_str(r#"[{"symbol":"AAPL","price":189.84,"volume":100}]"#).unwrap();

        let mut dashboard = Dashboard::new();
        dashboard.apply_at(Update::Markets(Ok(markets.clone())), now());
        dashboard.apply_at(Update::Quotes(Ok(quotes.clone())), now());

        assert_eq!(dashboard.cryptos, markets);
        assert_eq!(dashboard.stocks, quotes);
        assert_eq!(dashboard.crypto_status.updated, Some(now()));
        assert!(!dashboard.stock_status.is_stale());
    }

    #[test]
    fn later_cycle_replaces_earlier_one() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_at(
            Update::Markets(Ok(vec![asset("bitcoin", 1.0), asset("ethereum", 2.0)])),
            now(),
        );
        dashboard.apply_at(Update::Quotes(Ok(vec![stock("AAPL", 1.0)])), now());

        dashboard.apply_at(Update::Markets(Ok(vec![asset("solana", 3.0)])), now());
        dashboard.apply_at(Update::Quotes(Ok(vec![stock("TSLA", 2.0), stock("MSFT", 3.0)])), now());

        assert_eq!(dashboard.cryptos, vec![asset("solana", 3.0)]);
        assert_eq!(dashboard.stocks, vec![stock("TSLA", 2.0), stock("MSFT", 3.0)]);
    }

    #[test]
    fn failed_refresh_keeps_previous_data_and_marks_stale() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_at(Update::Quotes(Ok(vec![stock("AAPL", 1.0)])), now());
        dashboard.apply_at(Update::Quotes(Err(failure())), now());

        assert_eq!(dashboard.stocks, vec![stock("AAPL", 1.0)]);
        assert!(dashboard.stock_status.is_stale());
        assert_eq!(dashboard.stock_status.updated, Some(now()));

        dashboard.apply_at(Update::Quotes(Ok(vec![])), now());
        assert!(!dashboard.stock_status.is_stale());
        assert!(dashboard.stocks.is_empty());
    }

    #[test]
    fn dismiss_clears_series_before_next_selection() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_at(Update::Markets(Ok(vec![asset("bitcoin", 1.0)])), now());

        let (id, generation) = dashboard.select(0).unwrap();
        assert_eq!(id, "bitcoin");
        assert!(dashboard.is_loading_chart());
        dashboard.apply_at(
            Update::Chart {
                generation,
                id,
                series: Ok(vec![point(1.0), point(2.0)]),
            },
            now(),
        );
        assert_eq!(dashboard.series.len(), 2);

        dashboard.dismiss();
        assert!(dashboard.selected.is_none());
        assert!(dashboard.series.is_empty());
        assert!(!dashboard.is_loading_chart());
    }

    #[test]
    fn late_chart_for_dismissed_selection_is_ignored() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_at(
            Update::Markets(Ok(vec![asset("bitcoin", 1.0), asset("ethereum", 2.0)])),
            now(),
        );

        let (btc, btc_generation) = dashboard.select(0).unwrap();
        dashboard.dismiss();
        dashboard.apply_at(
            Update::Chart {
                generation: btc_generation,
                id: btc.clone(),
                series: Ok(vec![point(1.0)]),
            },
            now(),
        );
        assert!(dashboard.series.is_empty());

        let (_, eth_generation) = dashboard.select(1).unwrap();
        dashboard.apply_at(
            Update::Chart {
                generation: btc_generation,
                id: btc,
                series: Ok(vec![point(1.0)]),
            },
            now(),
        );
        assert!(dashboard.series.is_empty());
        assert_ne!(btc_generation, eth_generation);
    }

    #[test]
    fn reselecting_requests_a_fresh_chart() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_at(Update::Markets(Ok(vec![asset("bitcoin", 1.0)])), now());
        let first = dashboard.select(0).unwrap();
        dashboard.dismiss();
        let second = dashboard.select(0).unwrap();
        assert_eq!(first.0, second.0);
        assert!(second.1 > first.1);
    }

    #[test]
    fn empty_chart_reply_ends_loading() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_at(Update::Markets(Ok(vec![asset("bitcoin", 1.0)])), now());
        let (id, generation) = dashboard.select(0).unwrap();
        dashboard.apply_at(
            Update::Chart {
                generation,
                id,
                series: Ok(vec![]),
            },
            now(),
        );
        assert!(!dashboard.is_loading_chart());
        assert!(dashboard.chart_loaded);
        assert!(dashboard.series.is_empty());

        // the next selection starts loading again
        dashboard.dismiss();
        assert!(!dashboard.chart_loaded);
        dashboard.select(0);
        assert!(dashboard.is_loading_chart());
    }

    #[test]
    fn chart_failure_ends_loading() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_at(Update::Markets(Ok(vec![asset("bitcoin", 1.0)])), now());
        let (id, generation) = dashboard.select(0).unwrap();
        dashboard.apply_at(
            Update::Chart {
                generation,
                id,
                series: Err(failure()),
            },
            now(),
        );
        assert!(!dashboard.is_loading_chart());
        assert!(dashboard.chart_error.as_deref().unwrap().contains("Limit Reach"));
    }

    #[test]
    fn cursor_stays_inside_the_list() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.select_current().is_none());

        dashboard.apply_at(
            Update::Markets(Ok(vec![asset("bitcoin", 1.0), asset("ethereum", 2.0)])),
            now(),
        );
        dashboard.move_cursor(-1);
        assert_eq!(dashboard.cursor, 0);
        dashboard.move_cursor(5);
        assert_eq!(dashboard.cursor, 1);

        dashboard.apply_at(Update::Markets(Ok(vec![asset("solana", 3.0)])), now());
        assert_eq!(dashboard.cursor, 0);
        assert_eq!(dashboard.select_current().unwrap().0, "solana");
    }
}
