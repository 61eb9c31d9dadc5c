use crate::format::{self, Trend};
use colored::Colorize;
use pulse_client::prelude::*;

/// Plain-text rendering of both lists, for `pulse snapshot`.
pub fn snapshot(cryptos: &[AssetQuote], stocks: &[StockQuote]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Cryptocurrencies".bold()));
    if cryptos.is_empty() {
        out.push_str(&format!("  {}\n", "no data".dimmed()));
    }
    for asset in cryptos {
        out.push_str(&format!(
            "  {:<16} {:>14} {}\n",
            asset.name,
            format!("${}", format::price(asset.current_price)),
            change(asset.price_change_percentage_24h),
        ));
    }

    out.push_str(&format!("\n{}\n", "Stocks".bold()));
    if stocks.is_empty() {
        out.push_str(&format!("  {}\n", "no data".dimmed()));
    }
    for quote in stocks {
        out.push_str(&format!(
            "  {:<16} {:>14}\n",
            quote.symbol,
            format!("${}", format::price(quote.price)),
        ));
    }

    out
}

fn change(value: Option<f64>) -> String {
    let text = format!("{:>9}", format::percent(value));
    match Trend::of(value) {
        Trend::Up => text.green().to_string(),
        Trend::Down => text.red().to_string(),
        Trend::Unknown => text.dimmed().to_string(),
    }
}
