use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use pulse::cli::{Cli, Commands::*, TraceLevel};
use pulse::{chart, dashboard::Dashboard, print, tui};
use pulse_client::prelude::*;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, subscriber, trace, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Where `watch` sends its logs, since stdout belongs to the dashboard.
const LOG_FILE: &str = "pulse.log";

fn preprocess(trace_level: Level, to_file: bool) -> Result<()> {
    let builder = FmtSubscriber::builder().with_max_level(trace_level);
    if to_file {
        let file = std::fs::File::create(LOG_FILE)?;
        let my_subscriber = builder.with_ansi(false).with_writer(Mutex::new(file)).finish();
        subscriber::set_global_default(my_subscriber)?;
    } else {
        let my_subscriber = builder.with_writer(std::io::stderr).finish();
        subscriber::set_global_default(my_subscriber)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // grant access to .env
    dotenv().ok();

    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::TRACE => Level::TRACE,
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level, matches!(cli.command, Watch))?;
    trace!("Command line input recorded: {cli:#?}");

    let config = cli.watchlist.apply(Config::from_env());
    debug!(
        "watching {:?} and {:?} every {}s",
        config.crypto_ids,
        config.stock_symbols,
        config.interval.as_secs()
    );

    // cli framework:
    // "> pulse <COMMAND>"
    match &cli.command {
        // "> pulse watch"
        // live dashboard
        Watch => tui::run(config).await?,

        // "> pulse snapshot"
        // fetch both lists once and print them
        Snapshot => {
            let source = HttpSource::new(config)?;
            let (markets, quotes) = futures::future::join(source.markets(), source.quotes()).await;

            if let (Err(markets), Err(quotes)) = (&markets, &quotes) {
                anyhow::bail!("both feeds failed\n  crypto: {markets}\n  stocks: {quotes}");
            }
            let cryptos = markets.unwrap_or_else(|e| {
                error!("Crypto market fetch failed: {e}");
                vec![]
            });
            let stocks = quotes.unwrap_or_else(|e| {
                error!("Stock quote fetch failed: {e}");
                vec![]
            });
            print!("{}", print::snapshot(&cryptos, &stocks));
        }

        // "> pulse poll [--cycles N]"
        // headless poller; logs each refresh
        Poll { cycles } => poll(config, *cycles).await?,

        // "> pulse chart <ID>"
        // 7-day chart as an SVG polyline
        Chart { id } => {
            let source = HttpSource::new(config)?;
            let series = source.chart(id).await?;
            if series.is_empty() {
                warn!("[{id}] no price points returned");
            }
            println!("{}", chart::svg(&series));
        }
    }

    Ok(())
}

async fn poll(config: Config, cycles: Option<u32>) -> Result<()> {
    let source = Arc::new(HttpSource::new(config.clone())?);
    let (poller, mut rx) = Poller::spawn(source, config.interval);
    let mut dashboard = Dashboard::new();
    let (mut crypto_cycles, mut stock_cycles) = (0u32, 0u32);

    loop {
        let update = tokio::select! {
            update = rx.recv() => update,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        let Some(update) = update else { break };

        match &update {
            Update::Markets(_) => crypto_cycles += 1,
            Update::Quotes(_) => stock_cycles += 1,
            Update::Chart { .. } => {}
        }
        dashboard.apply(update);

        if dashboard.crypto_status.is_stale() || dashboard.stock_status.is_stale() {
            warn!(
                "Serving stale data | crypto: {:?} | stocks: {:?}",
                dashboard.crypto_status.error, dashboard.stock_status.error
            );
        }
        info!(
            "{} crypto rows (refresh #{crypto_cycles}), {} stock rows (refresh #{stock_cycles})",
            dashboard.cryptos.len(),
            dashboard.stocks.len()
        );
        for asset in &dashboard.cryptos {
            debug!(
                "{:<12} {:>14} {:>9}",
                asset.name,
                pulse::format::price(asset.current_price),
                pulse::format::percent(asset.price_change_percentage_24h)
            );
        }
        for quote in &dashboard.stocks {
            debug!("{:<12} {:>14}", quote.symbol, pulse::format::price(quote.price));
        }

        if let Some(limit) = cycles {
            if crypto_cycles >= limit && stock_cycles >= limit {
                break;
            }
        }
    }

    poller.shutdown();
    Ok(())
}
