//! Core domain + application logic for the VK music bot.
//!
//! This crate is framework-agnostic. Telegram and the VK API live behind ports
//! (traits) implemented in adapter crates.

pub mod config;
pub mod credentials;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod music;
pub mod paginator;
pub mod router;
pub mod session;
pub mod views;

pub use errors::{Error, Result};
