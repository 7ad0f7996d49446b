//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! it runs fetches through pipelines and keeps the snapshots the UI draws.

pub mod pipeline;
pub mod state;

pub use pipeline::*;
pub use state::*;
