pub mod api;
pub mod config;
pub mod error;
pub mod poller;
pub mod schema;

pub use crate::error::FetchError;

pub mod prelude {
    pub use crate::api::{build_client, HttpClient, HttpSource, MarketSource};
    pub use crate::config::Config;
    pub use crate::error::FetchError;
    pub use crate::poller::{Poller, Update};
    pub use crate::schema::{AssetQuote, PricePoint, StockQuote};
}
