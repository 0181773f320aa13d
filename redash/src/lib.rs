//! Redash API client and command dispatcher
//!
//! Layers, from the inside out:
//! - [`domain`]: query and data source records, update payloads
//! - [`application`]: [`application::RedashClient`] and its error taxonomy
//! - [`infrastructure`]: HTTP transport and wiring
//! - [`cli`]: argument parsing, command table, JSON output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
