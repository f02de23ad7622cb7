//! CLI argument definitions for gacha
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod account;
mod admin;
mod core;

pub use account::AccountCommand;
pub use admin::AdminCommand;
pub use core::{Cli, Commands, OutputFormat};
