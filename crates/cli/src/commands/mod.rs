//! Subcommand implementations

pub mod compare;
pub mod scenarios;
pub mod simulate;
