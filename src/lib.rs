//! TUSERS - Terminal User Directory Library
//!
//! A terminal client that fetches users from a JSON API and shows them as
//! loading, error, and list views, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
