//! The data-source seam between the domain and the outside world.

use super::errors::FetchResult;
use super::models::User;

/// Source of user records.
///
/// Implementations perform their own I/O and classify failures into
/// [`FetchError`](super::FetchError) kinds. Calls may block; callers run them
/// off the UI thread.
pub trait UserRepository: Send + Sync {
    /// Fetches the whole user collection.
    fn fetch_users(&self) -> FetchResult<Vec<User>>;

    /// Fetches a single user by identifier.
    fn fetch_user(&self, id: u64) -> FetchResult<User>;
}
