use crate::api::{get_json, HttpClient};
use crate::config::Config;
use crate::error::{FetchError, Result};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// 7-day daily history for a single asset, from CoinGecko
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) async fn fetch_chart(
    client: &HttpClient,
    config: &Config,
    id: &str,
) -> Result<Vec<PricePoint>> {
    let url = config.chart_url(id);
    let chart: MarketChart = get_json(client, &url).await?;

    if let Some(message) = chart.error {
        return Err(FetchError::Api { url, message });
    }

    match chart.prices {
        Some(prices) => {
            debug!("[{id}] {} price points", prices.len());
            Ok(prices)
        }
        None => {
            warn!("[{id}] response contained no \"prices\" array; using an empty series");
            Ok(vec![])
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
////////////////////////////////////////////////////////////////////////////////////////////////////

// {
//   "prices": [
//     [1711843200000, 69702.3],  // [unix millis, price]
//     ...
//   ],
//   "market_caps": [...],
//   "total_volumes": [...]
// }
#[derive(Deserialize, Debug)]
pub(crate) struct MarketChart {
    pub prices: Option<Vec<PricePoint>>,
    pub error: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub price: f64,
}

impl<'de> Deserialize<'de> for PricePoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (millis, price): (f64, f64) = Deserialize::deserialize(deserializer)?;
        let time = DateTime::from_timestamp_millis(millis as i64)
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {millis}")))?;
        Ok(PricePoint { time, price })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_timestamp_price_pairs() {
        let body = r#"{
            "prices": [[1711843200000, 69702.3], [1711929600000, 71333.48]],
            "market_caps": [[1711843200000, 1.0]]
        }"#;
        let chart: MarketChart = crate::api::decode("test", body.as_bytes()).unwrap();
        let prices = chart.prices.unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].time.to_rfc3339(), "2024-03-31T00:00:00+00:00");
        assert_eq!(prices[0].price, 69702.3);
        assert_eq!(prices[1].price, 71333.48);
    }

    #[test]
    fn missing_prices_is_none() {
        let chart: MarketChart = crate::api::decode("test", b"{}").unwrap();
        assert!(chart.prices.is_none());
        assert!(chart.error.is_none());
    }

    #[test]
    fn error_object_is_kept() {
        let chart: MarketChart =
            crate::api::decode("test", br#"{"error":"coin not found"}"#).unwrap();
        assert_eq!(chart.error.as_deref(), Some("coin not found"));
    }
}
