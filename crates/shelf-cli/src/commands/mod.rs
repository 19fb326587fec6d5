//! Command handlers for non-interactive subcommands

pub mod book;
pub mod config;
