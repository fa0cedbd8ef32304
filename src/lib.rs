pub mod albumart;
pub mod config;
pub mod session;
pub mod spotify;
pub mod ui;
pub mod util;
