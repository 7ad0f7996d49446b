use thiserror::Error;

/// Why a fetch did not produce data.
///
/// Observers never see this type directly; the pipeline renders it into a
/// message with [`FetchError::user_message`] before publishing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no network connectivity")]
    NoConnectivity,
    #[error("request timed out")]
    TimedOut,
    #[error("{0}")]
    Unrecognized(String),
}

impl FetchError {
    /// The text shown next to the retry affordance.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::NoConnectivity => {
                "No internet connection. Check your network and try again.".to_string()
            }
            FetchError::TimedOut => "Request timed out. Please try again.".to_string(),
            FetchError::Unrecognized(message) => message.clone(),
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_kind_specific() {
        assert!(FetchError::NoConnectivity.user_message().starts_with("No internet connection"));
        assert!(FetchError::TimedOut.user_message().starts_with("Request timed out"));
        assert_eq!(FetchError::Unrecognized("boom".into()).user_message(), "boom");
    }

    #[test]
    fn test_display_for_logs() {
        assert_eq!(FetchError::TimedOut.to_string(), "request timed out");
        assert_eq!(FetchError::Unrecognized("bad gateway".into()).to_string(), "bad gateway");
    }
}
