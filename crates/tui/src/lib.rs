pub mod app;
pub mod check;
pub mod client;
pub mod config;
pub mod error;
pub mod ui;
