use crate::api::MarketSource;
use crate::error::FetchError;
use crate::schema::{AssetQuote, PricePoint, StockQuote};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, trace};

/// Results delivered from the background fetches to whoever owns the display state.
#[derive(Debug)]
pub enum Update {
    Markets(Result<Vec<AssetQuote>, FetchError>),
    Quotes(Result<Vec<StockQuote>, FetchError>),
    Chart {
        /// Echo of the generation passed to [`Poller::fetch_chart`].
        generation: u64,
        id: String,
        series: Result<Vec<PricePoint>, FetchError>,
    },
}

/// Periodic refresh of both watchlists, plus on-demand chart fetches.
///
/// Every tick spawns the two list requests as independent tasks; a slow
/// response never delays the next tick and nothing is deduplicated. The
/// timer task is aborted when the poller is dropped.
pub struct Poller {
    source: Arc<dyn MarketSource>,
    tx: UnboundedSender<Update>,
    timer: JoinHandle<()>,
}

impl Poller {
    /// Start polling. The first refresh fires immediately.
    pub fn spawn(source: Arc<dyn MarketSource>, interval: Duration) -> (Self, UnboundedReceiver<Update>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = {
            let source = source.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                // `interval` panics on a zero period
                let mut ticker = time::interval(interval.max(Duration::from_millis(1)));
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if tx.is_closed() {
                        debug!("update receiver dropped; stopping refresh timer");
                        break;
                    }
                    trace!("refresh cycle");
                    spawn_refresh(&source, &tx);
                }
            })
        };
        debug!("poller started with a {}s interval", interval.as_secs_f64());
        (Self { source, tx, timer }, rx)
    }

    /// Refresh both lists now, outside the regular schedule.
    pub fn refresh(&self) {
        spawn_refresh(&self.source, &self.tx);
    }

    /// Fetch the price series for `id`. The reply carries `generation` back
    /// so the receiver can drop answers for selections it has moved past.
    pub fn fetch_chart(&self, id: &str, generation: u64) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let series = source.chart(&id).await;
            if let Err(e) = &series {
                error!("[{id}] chart fetch failed: {e}");
            }
            let _ = tx.send(Update::Chart {
                generation,
                id,
                series,
            });
        });
    }

    /// Stop the refresh timer. Requests already in flight still complete.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

fn spawn_refresh(source: &Arc<dyn MarketSource>, tx: &UnboundedSender<Update>) {
    {
        let source = source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let markets = source.markets().await;
            if let Err(e) = &markets {
                error!("crypto market refresh failed: {e}");
            }
            let _ = tx.send(Update::Markets(markets));
        });
    }

    {
        let source = source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let quotes = source.quotes().await;
            if let Err(e) = &quotes {
                error!("stock quote refresh failed: {e}");
            }
            let _ = tx.send(Update::Quotes(quotes));
        });
    }
}
