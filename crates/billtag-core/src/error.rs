//! Error types for billtag.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using billtag's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable codes for the tag definition domain errors.
///
/// The numeric values are part of the public API contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    TagDefinitionConflictsWithControlTag,
    TagDefinitionAlreadyExists,
    TagDefinitionDoesNotExist,
    TagDefinitionInUse,
}

impl ErrorCode {
    /// Numeric code.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::TagDefinitionConflictsWithControlTag => 3900,
            ErrorCode::TagDefinitionAlreadyExists => 3901,
            ErrorCode::TagDefinitionDoesNotExist => 3902,
            ErrorCode::TagDefinitionInUse => 3903,
        }
    }

    /// Symbolic name, e.g. `TAG_DEFINITION_IN_USE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TagDefinitionConflictsWithControlTag => {
                "TAG_DEFINITION_CONFLICTS_WITH_CONTROL_TAG"
            }
            ErrorCode::TagDefinitionAlreadyExists => "TAG_DEFINITION_ALREADY_EXISTS",
            ErrorCode::TagDefinitionDoesNotExist => "TAG_DEFINITION_DOES_NOT_EXIST",
            ErrorCode::TagDefinitionInUse => "TAG_DEFINITION_IN_USE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for billtag operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Name collides with a built-in control tag
    #[error("Cannot create tag definition {0}: conflicts with a control tag")]
    TagDefinitionConflictsWithControlTag(String),

    /// A user-defined definition with this name already exists
    #[error("Tag definition {0} already exists")]
    TagDefinitionAlreadyExists(String),

    /// No user-defined definition with this name
    #[error("Tag definition {0} does not exist")]
    TagDefinitionDoesNotExist(String),

    /// Definition is still referenced by tagged entities
    #[error("Tag definition {0} is in use and cannot be deleted")]
    TagDefinitionInUse(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Domain error code, if this is one of the tag definition errors.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::TagDefinitionConflictsWithControlTag(_) => {
                Some(ErrorCode::TagDefinitionConflictsWithControlTag)
            }
            Error::TagDefinitionAlreadyExists(_) => Some(ErrorCode::TagDefinitionAlreadyExists),
            Error::TagDefinitionDoesNotExist(_) => Some(ErrorCode::TagDefinitionDoesNotExist),
            Error::TagDefinitionInUse(_) => Some(ErrorCode::TagDefinitionInUse),
            _ => None,
        }
    }

    /// The tag definition name carried by a domain error.
    pub fn definition_name(&self) -> Option<&str> {
        match self {
            Error::TagDefinitionConflictsWithControlTag(name)
            | Error::TagDefinitionAlreadyExists(name)
            | Error::TagDefinitionDoesNotExist(name)
            | Error::TagDefinitionInUse(name) => Some(name),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_conflicts_with_control_tag() {
        let err = Error::TagDefinitionConflictsWithControlTag("AUTO_PAY_OFF".to_string());
        assert_eq!(
            err.to_string(),
            "Cannot create tag definition AUTO_PAY_OFF: conflicts with a control tag"
        );
    }

    #[test]
    fn test_error_display_already_exists() {
        let err = Error::TagDefinitionAlreadyExists("promo".to_string());
        assert_eq!(err.to_string(), "Tag definition promo already exists");
    }

    #[test]
    fn test_error_display_does_not_exist() {
        let err = Error::TagDefinitionDoesNotExist("promo".to_string());
        assert_eq!(err.to_string(), "Tag definition promo does not exist");
    }

    #[test]
    fn test_error_display_in_use() {
        let err = Error::TagDefinitionInUse("promo".to_string());
        assert_eq!(
            err.to_string(),
            "Tag definition promo is in use and cannot be deleted"
        );
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty name".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty name");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::TagDefinitionConflictsWithControlTag("x".into()).code(),
            Some(ErrorCode::TagDefinitionConflictsWithControlTag)
        );
        assert_eq!(
            Error::TagDefinitionInUse("x".into()).code().map(|c| c.code()),
            Some(3903)
        );
        assert_eq!(Error::Config("bad".into()).code(), None);
    }

    #[test]
    fn test_error_code_names() {
        assert_eq!(
            ErrorCode::TagDefinitionAlreadyExists.to_string(),
            "TAG_DEFINITION_ALREADY_EXISTS"
        );
        let json = serde_json::to_string(&ErrorCode::TagDefinitionDoesNotExist).unwrap();
        assert_eq!(json, r#""TAG_DEFINITION_DOES_NOT_EXIST""#);
    }

    #[test]
    fn test_definition_name() {
        let err = Error::TagDefinitionDoesNotExist("promo".to_string());
        assert_eq!(err.definition_name(), Some("promo"));
        assert_eq!(Error::Config("x".into()).definition_name(), None);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("Serialization error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
