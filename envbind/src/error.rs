//! Error types for binding environment variables into configuration structs

use std::fmt;

/// Boxed error returned by the self-conversion capability traits.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while processing a configuration struct.
///
/// A processing pass fails in one of three places:
/// - Discovery rejects the struct layout (`InvalidSpecification`)
/// - Resolution finds no value for a required key (`RequiredValueMissing`)
/// - Coercion cannot convert the raw string (`Parse`)
///
/// Parallel passes collect failures into `Multiple`, and the strict-mode
/// check reports stray variables as `UnknownVariable`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration struct cannot be walked.
    #[error("invalid specification: {reason}")]
    InvalidSpecification {
        /// Why discovery gave up
        reason: String,
    },

    /// A required key has neither an environment value nor a default.
    #[error("required key {key} missing value")]
    RequiredValueMissing {
        /// The alternate key if one is set, otherwise the derived key
        key: String,
    },

    /// A raw value could not be converted into its field.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Every failure of a parallel pass, in arrival order.
    #[error("multiple errors: [{}]", DisplayList(.0))]
    Multiple(Vec<Error>),

    /// A prefixed environment variable matches no discovered key.
    #[error("unknown environment variable {key}")]
    UnknownVariable {
        /// Name of the unexpected environment variable
        key: String,
    },
}

impl Error {
    #[doc(hidden)]
    pub fn missing(key: impl Into<String>) -> Self {
        Self::RequiredValueMissing { key: key.into() }
    }

    #[doc(hidden)]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidSpecification {
            reason: reason.into(),
        }
    }
}

/// A raw value could not be assigned to the field it was resolved for.
#[derive(Debug, thiserror::Error)]
#[error("assigning {key} to {field}: converting '{value}' to type {type_name}. details: {source}")]
pub struct ParseError {
    /// The derived lookup key
    pub key: String,
    /// The declared field name
    pub field: String,
    /// The Rust type of the destination
    pub type_name: String,
    /// The raw string that failed to convert
    pub value: String,
    /// What went wrong during conversion
    #[source]
    pub source: ConvertError,
}

/// Failure to coerce a raw string into a value.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The integer literal is malformed.
    #[error("parsing {value:?}: invalid syntax for {kind}")]
    IntSyntax {
        /// Name of the target integer type
        kind: &'static str,
        /// The offending literal
        value: String,
    },

    /// The integer is well formed but out of range or otherwise unparseable.
    #[error("parsing {value:?} as {kind}: {source}")]
    Int {
        /// Name of the target integer type
        kind: &'static str,
        /// The offending literal
        value: String,
        /// Underlying parse error
        source: std::num::ParseIntError,
    },

    /// The float literal is malformed.
    #[error("parsing {value:?}: {source}")]
    Float {
        /// The offending literal
        value: String,
        /// Underlying parse error
        source: std::num::ParseFloatError,
    },

    /// The float literal is well formed but exceeds the field's range.
    #[error("parsing {value:?}: value out of range")]
    FloatRange {
        /// The offending literal
        value: String,
    },

    /// The value is not one of the accepted boolean spellings.
    #[error("parsing {0:?}: invalid boolean")]
    Bool(String),

    /// The value is not a valid duration string.
    #[error(transparent)]
    Duration(#[from] humantime::DurationError),

    /// A map item did not split into exactly one key and one value.
    #[error("invalid map item: {0:?}")]
    InvalidMapEntry(String),

    /// The destination type has no string conversion.
    #[error("type {type_name} cannot be converted from a string")]
    Unsupported {
        /// The Rust type of the destination
        type_name: &'static str,
    },

    /// A self-conversion capability reported an error.
    #[error(transparent)]
    Custom(BoxError),

    /// A conversion failed with a plain message.
    #[error("{0}")]
    Message(String),
}

impl ConvertError {
    /// Create a conversion error from anything displayable (used by derived `FromStr` coercion)
    #[doc(hidden)]
    pub fn message(message: impl fmt::Display) -> Self {
        Self::Message(message.to_string())
    }
}

struct DisplayList<'a>(&'a [Error]);

impl fmt::Display for DisplayList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = Error::from(ParseError {
            key: "APP_PORT".to_string(),
            field: "port".to_string(),
            type_name: "u16".to_string(),
            value: "http".to_string(),
            source: ConvertError::IntSyntax {
                kind: "u16",
                value: "http".to_string(),
            },
        });

        let message = err.to_string();
        assert!(message.starts_with("assigning APP_PORT to port: converting 'http' to type u16"));
        assert!(message.contains("invalid syntax"));
    }

    #[test]
    fn test_multiple_lists_every_error() {
        let err = Error::Multiple(vec![Error::missing("A"), Error::missing("B")]);
        assert_eq!(
            err.to_string(),
            "multiple errors: [required key A missing value, required key B missing value]"
        );
    }

    #[test]
    fn test_parse_error_exposes_source() {
        use std::error::Error as _;

        let err = ParseError {
            key: "K".to_string(),
            field: "k".to_string(),
            type_name: "HashMap".to_string(),
            value: "x".to_string(),
            source: ConvertError::InvalidMapEntry("x".to_string()),
        };
        assert!(err.source().is_some());
    }
}
