use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::schema::{chart, crypto, stock};
use crate::schema::{AssetQuote, PricePoint, StockQuote};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{error, trace};

pub type HttpClient = reqwest::Client;

/// The three reads the dashboard needs. The poller only ever talks to this
/// trait, so it can be driven by something other than the live endpoints.
#[async_trait]
pub trait MarketSource: Send + Sync + 'static {
    /// Market snapshot for the configured cryptocurrency ids.
    async fn markets(&self) -> Result<Vec<AssetQuote>>;

    /// Short quotes for the configured stock symbols.
    async fn quotes(&self) -> Result<Vec<StockQuote>>;

    /// Daily price series for one asset over the chart window.
    async fn chart(&self, id: &str) -> Result<Vec<PricePoint>>;
}

/// [`MarketSource`] backed by CoinGecko & FinancialModelingPrep.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: HttpClient,
    config: Config,
}

impl HttpSource {
    pub fn new(config: Config) -> Result<Self> {
        let client = build_client(config.user_agent.as_deref())?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: HttpClient, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[async_trait]
impl MarketSource for HttpSource {
    async fn markets(&self) -> Result<Vec<AssetQuote>> {
        crypto::fetch_markets(&self.client, &self.config).await
    }

    async fn quotes(&self) -> Result<Vec<StockQuote>> {
        stock::fetch_quotes(&self.client, &self.config).await
    }

    async fn chart(&self, id: &str) -> Result<Vec<PricePoint>> {
        chart::fetch_chart(&self.client, &self.config, id).await
    }
}

pub fn build_client(user_agent: Option<&str>) -> Result<HttpClient> {
    let mut builder = reqwest::ClientBuilder::new();
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent);
    }
    Ok(builder.build()?)
}

/// GET `url`, check the status, and deserialize the body.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &HttpClient, url: &str) -> Result<T> {
    trace!("GET {url}");
    let response = client.get(url).send().await.map_err(|e| {
        error!("request error: {e}\nURL: {url}");
        e
    })?;

    let status = response.status();
    if !status.is_success() {
        error!("unexpected status {status}\nURL: {url}");
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response.bytes().await?;
    decode(url, &bytes)
}

pub(crate) fn decode<T: DeserializeOwned>(url: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|source| {
        error!("deserialization error: {source}\nURL: {url}");
        FetchError::Decode {
            url: url.to_string(),
            source,
        }
    })
}
