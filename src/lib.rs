//! Local honey shop directory.
//!
//! Fetches the curated shop list over HTTP, keeps an offline JSON snapshot
//! of it, and manages sign-in across pluggable identity providers.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod shops;
pub mod state;

pub use config::Config;
pub use error::{HoneyError, Result};
