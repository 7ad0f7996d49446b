//! Domain layer: models, the repository seam, use cases and fetch state.

pub mod models;
pub mod errors;
pub mod fetch_state;
pub mod repository;
pub mod use_cases;

pub use models::*;
pub use errors::*;
pub use fetch_state::*;
pub use repository::*;
pub use use_cases::*;
