pub mod chart;
pub mod crypto;
pub mod stock;

pub use chart::PricePoint;
pub use crypto::AssetQuote;
pub use stock::StockQuote;
