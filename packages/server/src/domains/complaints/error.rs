use thiserror::Error;

use super::duplicate_link::LinkViolation;

/// Failures of the complaint operations, each mapped to one HTTP status.
///
/// Messages are safe to show to the caller. Upstream details are logged
/// where they happen and not carried here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComplaintError {
    /// Missing, malformed or contradictory caller input.
    #[error("{0}")]
    InvalidArgument(String),

    /// A referenced complaint does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request is well-formed but the current data forbids it.
    #[error("{0}")]
    InvalidState(String),

    /// The AI gateway is throttling us.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The store or the AI gateway failed.
    #[error("{0}")]
    Upstream(String),
}

impl ComplaintError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}

impl From<LinkViolation> for ComplaintError {
    fn from(violation: LinkViolation) -> Self {
        let message = violation.to_string();
        match violation {
            LinkViolation::SelfReference => Self::InvalidArgument(message),
            LinkViolation::OriginalIsDuplicate | LinkViolation::AlreadyDuplicate => {
                Self::InvalidState(message)
            }
        }
    }
}
