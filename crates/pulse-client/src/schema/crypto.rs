use crate::api::{get_json, HttpClient};
use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Market snapshot from CoinGecko, for the whole watchlist in one request
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) async fn fetch_markets(client: &HttpClient, config: &Config) -> Result<Vec<AssetQuote>> {
    let url = config.markets_url();
    let markets: Vec<AssetQuote> = get_json(client, &url).await?;
    debug!("CoinGecko returned {} market rows", markets.len());
    Ok(markets)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
////////////////////////////////////////////////////////////////////////////////////////////////////

// [
//   {
//     "id": "bitcoin",
//     "symbol": "btc",
//     "name": "Bitcoin",
//     "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
//     "current_price": 67012.5,
//     "price_change_percentage_24h": -1.2345,
//     ...
//   },
//   ...
// ]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AssetQuote {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}
