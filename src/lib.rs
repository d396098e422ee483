// The binary in main.rs drives the terminal; everything it uses lives here so
// integration tests can reach the engine without a terminal.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod provider;
pub mod status;
pub mod ui;
