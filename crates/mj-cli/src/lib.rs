//! Earnings tracker CLI library.
//!
//! This crate provides the `mj` command-line interface: argument parsing,
//! configuration, the application state and the commands that render to it.

pub mod app;
mod cli;
pub mod commands;
mod config;
pub mod fx;
pub mod render;

pub use app::App;
pub use cli::{Cli, Commands};
pub use config::Config;
