//! Render - draws the dashboard from a [`Dashboard`] snapshot

use crate::chart::{self, HEIGHT, WIDTH};
use crate::dashboard::{Dashboard, FeedStatus};
use crate::format::{self, Trend};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{self, Canvas, Points},
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
    },
    Frame,
};

pub const FOOTER: &str = "Data from CoinGecko & FinancialModelingPrep • Not financial advice";
pub const LOADING: &str = "Loading 7-day chart…";
pub const NO_DATA: &str = "No price data for the last 7 days";

pub fn draw_ui(f: &mut Frame, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_header(f, rows[0], dashboard);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    draw_cryptos(f, panels[0], dashboard);
    draw_stocks(f, panels[1], dashboard);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            FOOTER,
            Style::default().fg(Color::DarkGray),
        ))),
        rows[2],
    );

    if dashboard.selected.is_some() {
        draw_chart_overlay(f, dashboard);
    }
}

fn draw_header(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                "MarketPulse",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  Live crypto & stock snapshot",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::raw("crypto: "),
            status_span(&dashboard.crypto_status),
            Span::raw("   stocks: "),
            status_span(&dashboard.stock_status),
        ]),
        Line::from(Span::styled(
            "↑/↓ move  Enter chart  Esc close  r refresh  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn status_span(status: &FeedStatus) -> Span<'static> {
    match (&status.error, status.updated) {
        (Some(error), _) => Span::styled(
            format!("stale ({error})"),
            Style::default().fg(Color::Yellow),
        ),
        (None, Some(updated)) => Span::styled(
            format!("updated {}", updated.format("%H:%M:%S")),
            Style::default().fg(Color::Green),
        ),
        (None, None) => Span::styled("waiting…", Style::default().fg(Color::DarkGray)),
    }
}

fn draw_cryptos(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let items: Vec<ListItem> = dashboard
        .cryptos
        .iter()
        .map(|asset| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<14}", asset.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>14} ", format!("${}", format::price(asset.current_price)))),
                Span::styled(
                    format!("{:>9}", format::percent(asset.price_change_percentage_24h)),
                    trend_style(Trend::of(asset.price_change_percentage_24h)),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel("Cryptocurrencies", dashboard.crypto_status.is_stale()))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !dashboard.cryptos.is_empty() {
        state.select(Some(dashboard.cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_stocks(f: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let items: Vec<ListItem> = dashboard
        .stocks
        .iter()
        .map(|quote| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8}", quote.symbol),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>14}", format!("${}", format::price(quote.price)))),
            ]))
        })
        .collect();

    f.render_widget(
        List::new(items).block(panel("Stocks", dashboard.stock_status.is_stale())),
        area,
    );
}

fn draw_chart_overlay(f: &mut Frame, dashboard: &Dashboard) {
    let area = centered_rect(60, 60, f.size());
    let title = dashboard
        .selected
        .as_ref()
        .map(|asset| asset.name.as_str())
        .unwrap_or("Details");
    let block = Block::default()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, area);

    if let Some(error) = &dashboard.chart_error {
        let text = Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(text, area);
        return;
    }

    if dashboard.is_loading_chart() {
        let text = Paragraph::new(Span::styled(LOADING, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(text, area);
        return;
    }

    if dashboard.series.is_empty() {
        let text = Paragraph::new(Span::styled(NO_DATA, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(text, area);
        return;
    }

    // polyline y grows downward; canvas y grows upward
    let points: Vec<(f64, f64)> = chart::polyline(&dashboard.series, WIDTH, HEIGHT)
        .into_iter()
        .map(|(x, y)| (x, HEIGHT - y))
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, WIDTH])
        .y_bounds([0.0, HEIGHT])
        .paint(move |ctx| {
            if points.len() == 1 {
                ctx.draw(&Points {
                    coords: &points,
                    color: Color::Blue,
                });
            }
            for pair in points.windows(2) {
                ctx.draw(&canvas::Line::new(
                    pair[0].0,
                    pair[0].1,
                    pair[1].0,
                    pair[1].1,
                    Color::Blue,
                ));
            }
        });
    f.render_widget(canvas, area);
}

fn panel(title: &str, stale: bool) -> Block<'_> {
    let border = if stale { Color::Yellow } else { Color::Gray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn trend_style(trend: Trend) -> Style {
    match trend {
        Trend::Up => Style::default().fg(Color::Green),
        Trend::Down => Style::default().fg(Color::Red),
        Trend::Unknown => Style::default().fg(Color::DarkGray),
    }
}

/// A rect of `percent_x` by `percent_y` of `area`, centred in it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
