pub mod chart;
pub mod cli;
pub mod dashboard;
pub mod format;
pub mod print;
pub mod tui;
