//! The four-state result shared by every layer of the fetch flow.

use super::errors::FetchError;

/// Progress of a single fetch, as published to observers.
///
/// A value is created `Idle` and only leaves it through an explicit start.
/// Each attempt then moves through `Pending` to exactly one of the terminal
/// variants `Ok` or `Failed`.
///
/// # Examples
///
/// ```
/// use tusers::domain::{FetchError, FetchState};
///
/// let state: FetchState<u32> = FetchState::from_result(Err(FetchError::TimedOut));
/// assert!(state.is_terminal());
/// assert_eq!(state.error_message(), Some("Request timed out. Please try again."));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    /// Nothing has been requested yet
    #[default]
    Idle,
    /// An attempt is in flight
    Pending,
    /// The latest attempt succeeded
    Ok(T),
    /// The latest attempt failed; carries the user-facing message
    Failed(String),
}

impl<T> FetchState<T> {
    /// Converts a finished attempt into its terminal state.
    ///
    /// Errors are rendered into their user-facing message; the failure kind
    /// itself is not kept.
    pub fn from_result(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => FetchState::Ok(value),
            Err(err) => FetchState::Failed(err.user_message()),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, FetchState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    /// `Ok` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Ok(_) | FetchState::Failed(_))
    }

    /// The loaded value, if the latest attempt succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Ok(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if the latest attempt failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Pending => "pending",
            FetchState::Ok(_) => "ok",
            FetchState::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state: FetchState<Vec<u8>> = FetchState::default();
        assert!(state.is_idle());
        assert!(!state.is_terminal());
        assert!(state.value().is_none());
    }

    #[test]
    fn test_from_result_ok() {
        let state = FetchState::from_result(Ok(vec![1, 2, 3]));
        assert_eq!(state, FetchState::Ok(vec![1, 2, 3]));
        assert_eq!(state.value(), Some(&vec![1, 2, 3]));
        assert!(state.error_message().is_none());
    }

    #[test]
    fn test_from_result_renders_each_failure_kind() {
        let offline: FetchState<()> = FetchState::from_result(Err(FetchError::NoConnectivity));
        assert_eq!(
            offline,
            FetchState::Failed("No internet connection. Check your network and try again.".to_string())
        );

        let slow: FetchState<()> = FetchState::from_result(Err(FetchError::TimedOut));
        assert_eq!(slow.error_message(), Some("Request timed out. Please try again."));

        // Unrecognized failures fall back to the transport's own text
        let other: FetchState<()> =
            FetchState::from_result(Err(FetchError::Unrecognized("server responded with 502".into())));
        assert_eq!(other.error_message(), Some("server responded with 502"));
    }

    #[test]
    fn test_pending_is_not_terminal() {
        let state: FetchState<()> = FetchState::Pending;
        assert!(state.is_pending());
        assert!(!state.is_terminal());
        assert_eq!(state.label(), "pending");
    }
}
