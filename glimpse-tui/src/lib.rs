// Library interface for glimpse-tui (for testing purposes)
#[macro_use]
pub mod logging;

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod session;
pub mod terminal;
pub mod ui;
