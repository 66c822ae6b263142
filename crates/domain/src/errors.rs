//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Subject identifier is malformed or out of range
    #[error("Invalid subject id: {0}")]
    InvalidSubjectId(String),

    /// Unknown rate-limit action name
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Rate-limit policy with impossible parameters
    #[error("Invalid rate limit policy: {0}")]
    InvalidPolicy(String),

    /// Question text rejected by validation
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    /// Unknown deck name
    #[error("Unknown deck: {0}")]
    UnknownDeck(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_subject_id_message() {
        let err = DomainError::InvalidSubjectId("0".to_string());
        assert_eq!(err.to_string(), "Invalid subject id: 0");
    }

    #[test]
    fn unknown_action_message() {
        let err = DomainError::UnknownAction("upload".to_string());
        assert_eq!(err.to_string(), "Unknown action: upload");
    }

    #[test]
    fn invalid_policy_message() {
        let err = DomainError::InvalidPolicy("window must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid rate limit policy: window must be positive"
        );
    }

    #[test]
    fn not_permitted_message() {
        let err = DomainError::NotPermitted("self referral".to_string());
        assert_eq!(err.to_string(), "Operation not permitted: self referral");
    }
}
