//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP transport that talks to the users API and
//! the configuration loader.

pub mod api;
pub mod config;

pub use api::*;
pub use config::*;
