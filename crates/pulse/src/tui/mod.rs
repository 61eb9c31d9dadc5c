//! Terminal dashboard: two live lists and a chart overlay.

mod event_loop;
mod render;

pub use event_loop::{handle_key, run, Action};
pub use render::{centered_rect, draw_ui};
