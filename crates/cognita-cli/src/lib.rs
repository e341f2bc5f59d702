//! Cognita CLI library
//!
//! Argument definitions, application wiring and command implementations for
//! the `cog` binary.

pub mod cli;
pub mod commands;
pub mod context;
pub mod output;
