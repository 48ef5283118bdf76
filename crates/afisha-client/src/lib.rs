//! CLI, configuration, admin allow-list, rendering commands and actions.
//!
//! This crate provides the `afisha` command-line interface.

pub mod access;
pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
