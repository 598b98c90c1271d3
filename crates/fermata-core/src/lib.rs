//! Core domain + application logic for the Fermata transit bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind the
//! messaging port implemented in the adapter crate; the transit backend lives
//! behind the provider trait.

pub mod classify;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod provider;
pub mod relay;
pub mod render;

pub use errors::{Error, Result};
