//! Event Loop - terminal setup, update draining and key handling

use super::render::draw_ui;
use crate::dashboard::Dashboard;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pulse_client::prelude::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

/// What a key press asks of the loop, after the dashboard has been updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    FetchChart { id: String, generation: u64 },
}

/// Run the dashboard until the user quits.
pub async fn run(config: Config) -> Result<()> {
    let source = Arc::new(HttpSource::new(config.clone())?);
    let (poller, mut rx) = Poller::spawn(source, config.interval);

    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!("Failed to enable raw mode: {e}. Ensure you're running in a real terminal (TTY).")
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {e}")
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = open_terminal(backend, || {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    })?;
    let mut dashboard = Dashboard::new();

    let result = run_event_loop(&mut terminal, &mut dashboard, &poller, &mut rx).await;

    // stop the timer before handing the terminal back
    poller.shutdown();
    let cleanup = restore_terminal(&mut terminal);
    info!("dashboard closed");

    result.and(cleanup)
}

/// Wrap `backend` in a [`Terminal`]. On failure `cleanup` runs first, so the
/// shell is not left in raw mode on the alternate screen.
fn open_terminal<B: Backend>(backend: B, cleanup: impl FnOnce()) -> Result<Terminal<B>> {
    Terminal::new(backend).map_err(|e| {
        cleanup();
        anyhow::anyhow!("Failed to initialize terminal: {e}")
    })
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    dashboard: &mut Dashboard,
    poller: &Poller,
    rx: &mut UnboundedReceiver<Update>,
) -> Result<()> {
    loop {
        while let Ok(update) = rx.try_recv() {
            dashboard.apply(update);
        }

        terminal.draw(|f| draw_ui(f, dashboard))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match handle_key(dashboard, key) {
            Action::None => {}
            Action::Quit => break,
            Action::Refresh => {
                debug!("manual refresh");
                poller.refresh();
            }
            Action::FetchChart { id, generation } => {
                debug!("[{id}] selected");
                poller.fetch_chart(&id, generation);
            }
        }
    }
    Ok(())
}

/// Apply one key press to the dashboard.
pub fn handle_key(dashboard: &mut Dashboard, key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => Action::Quit,
        (KeyCode::Esc, _) => {
            dashboard.dismiss();
            Action::None
        }
        (KeyCode::Char('r'), _) => Action::Refresh,
        // the list underneath is frozen while the overlay is open
        _ if dashboard.selected.is_some() => Action::None,
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
            dashboard.move_cursor(-1);
            Action::None
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
            dashboard.move_cursor(1);
            Action::None
        }
        (KeyCode::Enter, _) => match dashboard.select_current() {
            Some((id, generation)) => Action::FetchChart { id, generation },
            None => Action::None,
        },
        _ => Action::None,
    }
}
