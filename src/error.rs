// src/error.rs

//! Error types for registry construction and manifest handling

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading a manifest or building a registry
///
/// None of these are transient: they indicate a bad request or a defect in
/// the component table, so callers abort rather than retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unknown feature, unsupported platform or malformed gate expression
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The component table is internally inconsistent
    #[error("Consistency error: {0}")]
    ConsistencyError(#[from] ConsistencyError),

    /// Manifest content could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Manifest file could not be read
    #[error("I/O error: {0}")]
    IoError(String),

    /// Package metadata could not be rendered
    #[error("Serialization error: {0}")]
    SerializeError(String),

    /// A queried component does not exist in the registry
    #[error("Component not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True for errors caused by the caller's request rather than the table
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }

    /// True for authoring defects in the component table
    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::ConsistencyError(_))
    }
}

/// Authoring defects detected while validating a gated component set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A component requires another that is absent after gating
    #[error("component '{component}' requires '{missing}', which is not in the registry")]
    Dangling { component: String, missing: String },

    /// The requirement relation loops back on itself
    #[error("dependency cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// Two manifest rows share an id
    #[error("component '{id}' is declared more than once")]
    DuplicateComponent { id: String },

    /// A gate names a feature the manifest never declares
    #[error("component '{component}' is gated on undeclared feature '{feature}'")]
    UnknownGateFeature { component: String, feature: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display_joins_path() {
        let err = ConsistencyError::Cycle {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle: A -> B -> A");
    }

    #[test]
    fn test_consistency_converts_into_error() {
        let err: Error = ConsistencyError::Dangling {
            component: "TAO".into(),
            missing: "ACE".into(),
        }
        .into();
        assert!(err.is_consistency());
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("requires 'ACE'"));
    }

    #[test]
    fn test_serialize_error_is_not_a_parse_error() {
        let err = Error::SerializeError("package info: key must be a string".into());
        assert_eq!(
            err.to_string(),
            "Serialization error: package info: key must be a string"
        );
        assert!(!matches!(err, Error::ParseError(_)));
        assert!(!err.is_configuration());
        assert!(!err.is_consistency());
    }
}
