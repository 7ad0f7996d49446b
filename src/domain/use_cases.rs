//! Use cases exposed by the domain layer.
//!
//! Each use case wraps a shared [`UserRepository`] and is cheap to clone, so
//! it can be moved into a fetch pipeline as the operation it runs.

use std::sync::Arc;

use super::errors::FetchResult;
use super::models::User;
use super::repository::UserRepository;

/// Loads every user.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tusers::domain::{FetchResult, GetUsers, User, UserRepository};
///
/// struct Fixed;
///
/// impl UserRepository for Fixed {
///     fn fetch_users(&self) -> FetchResult<Vec<User>> {
///         Ok(vec![User::new(1, "Leanne Graham")])
///     }
///     fn fetch_user(&self, id: u64) -> FetchResult<User> {
///         Ok(User::new(id, "Leanne Graham"))
///     }
/// }
///
/// let get_users = GetUsers::new(Arc::new(Fixed));
/// assert_eq!(get_users.execute().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct GetUsers {
    repository: Arc<dyn UserRepository>,
}

impl GetUsers {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self) -> FetchResult<Vec<User>> {
        self.repository.fetch_users()
    }
}

/// Loads one user by id.
#[derive(Clone)]
pub struct GetUserById {
    repository: Arc<dyn UserRepository>,
}

impl GetUserById {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: u64) -> FetchResult<User> {
        self.repository.fetch_user(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FetchError;

    struct Offline;

    impl UserRepository for Offline {
        fn fetch_users(&self) -> FetchResult<Vec<User>> {
            Err(FetchError::NoConnectivity)
        }

        fn fetch_user(&self, _id: u64) -> FetchResult<User> {
            Err(FetchError::NoConnectivity)
        }
    }

    struct Single;

    impl UserRepository for Single {
        fn fetch_users(&self) -> FetchResult<Vec<User>> {
            Ok(vec![User::new(1, "Leanne")])
        }

        fn fetch_user(&self, id: u64) -> FetchResult<User> {
            if id == 1 {
                Ok(User::new(1, "Leanne"))
            } else {
                Err(FetchError::Unrecognized(format!("user {} not found", id)))
            }
        }
    }

    #[test]
    fn test_get_users_passes_through_repository_result() {
        let ok = GetUsers::new(Arc::new(Single));
        assert_eq!(ok.execute(), Ok(vec![User::new(1, "Leanne")]));

        let offline = GetUsers::new(Arc::new(Offline));
        assert_eq!(offline.execute(), Err(FetchError::NoConnectivity));
    }

    #[test]
    fn test_get_user_by_id() {
        let use_case = GetUserById::new(Arc::new(Single));
        assert_eq!(use_case.execute(1).unwrap().name, "Leanne");
        assert_eq!(
            use_case.execute(9),
            Err(FetchError::Unrecognized("user 9 not found".to_string()))
        );
    }
}
