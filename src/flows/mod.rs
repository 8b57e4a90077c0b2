//! Flow controllers — one per onboarding step.
//!
//! Each controller follows the same sequential protocol: validate local
//! state first (no network call on failure), read the session token
//! (absent means redirect to the entry screen), issue at most one
//! request, and return a tagged [`Outcome`] for the presentation layer
//! to act on. No controller panics or leaks raw errors.

pub mod account;
pub mod counsellors;
pub mod location;
pub mod preferences;
pub mod sessions;
pub mod steps;
pub mod uploads;

pub use steps::OnboardingStep;

/// Result of a user-initiated action on a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The action succeeded; advance to the next step with the data it
    /// produced.
    Proceed(T),
    /// Stay on the current screen and show the message; the user may
    /// retry.
    Retry(String),
    /// The session token is absent; return to the entry screen and
    /// re-authenticate.
    Redirect,
}

impl<T> Outcome<T> {
    pub fn retry(message: impl Into<String>) -> Self {
        Self::Retry(message.into())
    }

    pub fn proceeded(&self) -> bool {
        matches!(self, Self::Proceed(_))
    }

    /// The retry message, when there is one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Retry(message) => Some(message),
            _ => None,
        }
    }

    /// The carried value, when the action proceeded.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Proceed(value) => Some(value),
            _ => None,
        }
    }
}
