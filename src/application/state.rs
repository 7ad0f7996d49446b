//! Application state for the terminal user directory.
//!
//! [`App`] owns the fetch pipelines and keeps the latest state observed from
//! each of them. The presentation layer only reads those snapshots and calls
//! the command methods here.

use std::sync::Arc;

use log::debug;

use crate::domain::{FetchState, GetUserById, GetUsers, User, UserRepository};
use super::pipeline::{Pipeline, Subscription};

/// Which screen is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The list of all users
    List,
    /// Details for one user
    Detail,
}

/// A detail screen bound to one user id.
///
/// Dropping the pane drops its pipeline, so a fetch still in flight for a
/// closed pane is never published.
pub struct DetailPane {
    pub user_id: u64,
    pub state: FetchState<User>,
    pipeline: Pipeline<User>,
    updates: Subscription<User>,
}

impl DetailPane {
    fn open(get_user: &GetUserById, user_id: u64) -> Self {
        let use_case = get_user.clone();
        let pipeline = Pipeline::new(format!("user-{}", user_id), move || use_case.execute(user_id));
        let updates = pipeline.subscribe();
        pipeline.start();
        Self {
            user_id,
            state: FetchState::Idle,
            pipeline,
            updates,
        }
    }

    fn poll(&mut self) -> bool {
        let mut changed = false;
        for state in self.updates.drain() {
            self.state = state;
            changed = true;
        }
        changed
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tusers::application::{App, Screen};
/// use tusers::domain::{FetchResult, User, UserRepository};
///
/// struct Empty;
///
/// impl UserRepository for Empty {
///     fn fetch_users(&self) -> FetchResult<Vec<User>> {
///         Ok(Vec::new())
///     }
///     fn fetch_user(&self, id: u64) -> FetchResult<User> {
///         Ok(User::new(id, "nobody"))
///     }
/// }
///
/// let app = App::from_repository(Arc::new(Empty));
/// assert_eq!(app.screen, Screen::List);
/// assert!(app.users_state.is_idle());
/// ```
pub struct App {
    /// Latest state seen on the list pipeline
    pub users_state: FetchState<Vec<User>>,
    /// Screen currently displayed
    pub screen: Screen,
    /// Index of the highlighted row in the list
    pub selected: usize,
    /// Open detail screen, if any
    pub detail: Option<DetailPane>,
    /// Where the data comes from, shown in the header
    pub source: String,
    /// Set once the user asked to exit
    pub should_quit: bool,
    users: Pipeline<Vec<User>>,
    users_updates: Subscription<Vec<User>>,
    get_user: GetUserById,
}

impl App {
    pub fn new(get_users: GetUsers, get_user: GetUserById) -> Self {
        let users = Pipeline::new("users", move || get_users.execute());
        let users_updates = users.subscribe();
        Self {
            users_state: FetchState::Idle,
            screen: Screen::List,
            selected: 0,
            detail: None,
            source: String::new(),
            should_quit: false,
            users,
            users_updates,
            get_user,
        }
    }

    pub fn from_repository(repository: Arc<dyn UserRepository>) -> Self {
        Self::new(
            GetUsers::new(Arc::clone(&repository)),
            GetUserById::new(repository),
        )
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Kicks off the first list fetch.
    pub fn load(&mut self) {
        self.users.start();
    }

    /// Re-runs the fetch behind the current screen.
    pub fn retry(&mut self) {
        match (self.screen, self.detail.as_ref()) {
            (Screen::Detail, Some(pane)) => {
                debug!("retrying {}", pane.pipeline.name());
                pane.pipeline.retry();
            }
            _ => {
                debug!("retrying {}", self.users.name());
                self.users.retry();
            }
        }
    }

    /// Applies every publication received since the last call.
    ///
    /// Returns `true` if anything changed and the screen should be redrawn.
    pub fn poll_updates(&mut self) -> bool {
        let mut changed = false;
        for state in self.users_updates.drain() {
            self.users_state = state;
            changed = true;
        }
        if changed {
            self.clamp_selection();
        }
        if let Some(pane) = self.detail.as_mut() {
            changed |= pane.poll();
        }
        changed
    }

    /// Users currently on screen, if the last list fetch succeeded.
    pub fn users(&self) -> &[User] {
        self.users_state.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.users().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.users().len().saturating_sub(1);
    }

    /// Opens the detail screen for the highlighted user and starts its fetch.
    pub fn open_detail(&mut self) {
        let Some(user_id) = self.selected_user().map(|user| user.id) else {
            return;
        };
        debug!("opening user {}", user_id);
        self.detail = Some(DetailPane::open(&self.get_user, user_id));
        self.screen = Screen::Detail;
    }

    /// Returns to the list, discarding the detail fetch.
    pub fn close_detail(&mut self) {
        self.detail = None;
        self.screen = Screen::List;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn clamp_selection(&mut self) {
        let len = self.users().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
