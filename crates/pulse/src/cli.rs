use clap::{Args, Parser, Subcommand, ValueEnum};
use pulse_client::config::Config;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub watchlist: WatchlistArgs,

    /// Sets the level of tracing
    #[arg(long, global = true, value_enum, ignore_case = true, default_value_t = TraceLevel::INFO)]
    pub trace: TraceLevel,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Live dashboard in the terminal.
    Watch,

    /// Fetch both lists once and print them.
    Snapshot,

    /// Run the poller without a UI, logging every refresh.
    Poll {
        /// Stop after this many refresh results per list; runs forever if omitted.
        #[arg(long)]
        cycles: Option<u32>,
    },

    /// Print the 7-day chart of one asset as an SVG polyline.
    Chart {
        /// CoinGecko asset id, e.g. "bitcoin".
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WatchlistArgs {
    /// Seconds between refresh cycles.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Comma-separated CoinGecko ids.
    #[arg(long, global = true, value_delimiter = ',')]
    pub crypto: Option<Vec<String>>,

    /// Comma-separated stock ticker symbols.
    #[arg(long, global = true, value_delimiter = ',')]
    pub stocks: Option<Vec<String>>,

    /// Quote currency for crypto prices.
    #[arg(long, global = true)]
    pub currency: Option<String>,
}

impl WatchlistArgs {
    /// Flags win over the environment, which wins over the built-in defaults.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.interval {
            config.interval = Duration::from_secs(secs);
        }
        if let Some(ids) = &self.crypto {
            config.crypto_ids = ids.iter().map(|id| id.trim().to_lowercase()).collect();
        }
        if let Some(symbols) = &self.stocks {
            config.stock_symbols = symbols.iter().map(|s| s.trim().to_uppercase()).collect();
        }
        if let Some(currency) = &self.currency {
            config.currency = currency.to_lowercase();
        }
        config
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}
