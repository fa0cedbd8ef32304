pub mod ansi;
pub mod app;
pub mod tui;
pub mod widgets;
