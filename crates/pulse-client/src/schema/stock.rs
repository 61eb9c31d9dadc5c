use crate::api::{get_json, HttpClient};
use crate::config::Config;
use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Short quotes from FinancialModelingPrep
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) async fn fetch_quotes(client: &HttpClient, config: &Config) -> Result<Vec<StockQuote>> {
    let url = config.quotes_url();
    match get_json::<QuoteResponse>(client, &url).await? {
        QuoteResponse::Quotes(quotes) => {
            debug!("FMP returned {} quotes", quotes.len());
            Ok(quotes)
        }
        QuoteResponse::Error { message } => {
            // FMP answers 200 with an error object for a missing or invalid key
            error!("FMP rejected the quote request: {message}");
            Err(FetchError::Api {
                url: redact(&url),
                message,
            })
        }
    }
}

fn redact(url: &str) -> String {
    match url.split_once("apikey=") {
        Some((head, _)) => format!("{head}apikey=***"),
        None => url.to_string(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
////////////////////////////////////////////////////////////////////////////////////////////////////

// [
//   { "symbol": "AAPL", "price": 189.84, "volume": 52345678 },
//   ...
// ]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StockQuote {
    pub symbol: String,
    pub price: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum QuoteResponse {
    Quotes(Vec<StockQuote>),
    Error {
        #[serde(rename = "Error Message")]
        message: String,
    },
}
