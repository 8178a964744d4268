//! livewatch library crate.
//!
//! Watches a configured set of Twitch channels and emits exactly one
//! notification per online/offline transition, polling on a fixed
//! interval. The binary in `main.rs` is a thin CLI over this library.

pub mod config;
pub mod error;
pub mod monitor;
pub mod notification;

pub use error::{Error, Result};
