//! Typed error handling for the collection layer
//!
//! Every fallible operation in the crate returns [`CollectionError`]. Each
//! variant carries a stable, machine-readable code (see
//! [`CollectionError::error_code`]) so that view code can decide what to
//! render without matching on message strings.
//!
//! # Error Categories
//!
//! - [`CollectionError::MalformedResponse`]: the fetched envelope does not
//!   have the expected shape
//! - [`CollectionError::InvalidComparatorField`]: a sort directive string
//!   names an unusable field (a caller bug, reported at the parse boundary)
//! - [`CollectionError::Transport`]: the HTTP source failed before a body
//!   could be decoded
//! - [`ConfigError`]: configuration parsing and validation
//!
//! Duplicate ids are *not* an error: inserting a record whose id is already
//! present replaces the stored record.
//!
//! # Example
//!
//! ```rust,ignore
//! match apps.apply_response(ticket, envelope) {
//!     Ok(outcome) => tracing::info!(?outcome, "apps refreshed"),
//!     Err(CollectionError::MalformedResponse { reason }) => {
//!         show_banner(&format!("failed to load apps: {reason}"));
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type for the crate
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The response envelope lacks the expected array field, or a record in
    /// it cannot be instantiated
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// A sort directive string does not name a valid field
    #[error("Invalid comparator field in '{spec}'")]
    InvalidComparatorField { spec: String },

    /// The fetch collaborator failed at the transport level
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Serializable error body for view layers that forward errors as JSON
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CollectionError {
    /// Shorthand for building a [`CollectionError::MalformedResponse`]
    pub fn malformed(reason: impl Into<String>) -> Self {
        CollectionError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CollectionError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            CollectionError::InvalidComparatorField { .. } => "INVALID_COMPARATOR_FIELD",
            CollectionError::Transport { .. } => "TRANSPORT_ERROR",
            CollectionError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether retrying the same fetch could succeed
    ///
    /// Only transport failures without a status, or with a 5xx status, are
    /// considered transient. A malformed body will stay malformed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CollectionError::Transport { status: None, .. } => true,
            CollectionError::Transport {
                status: Some(status),
                ..
            } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CollectionError::InvalidComparatorField { spec } => {
                Some(serde_json::json!({ "spec": spec }))
            }
            CollectionError::Transport {
                status: Some(status),
                ..
            } => Some(serde_json::json!({ "status": status })),
            CollectionError::Config(ConfigError::InvalidValue { field, value, .. }) => {
                Some(serde_json::json!({ "field": field, "value": value }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CollectionError::malformed("missing apps").error_code(),
            "MALFORMED_RESPONSE"
        );
        assert_eq!(
            CollectionError::InvalidComparatorField {
                spec: "-".to_string()
            }
            .error_code(),
            "INVALID_COMPARATOR_FIELD"
        );
        let config: CollectionError = ConfigError::ParseError {
            message: "bad yaml".to_string(),
        }
        .into();
        assert_eq!(config.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_display_messages() {
        let err = CollectionError::malformed("field 'apps' is missing");
        assert_eq!(err.to_string(), "Malformed response: field 'apps' is missing");

        let err = CollectionError::InvalidComparatorField {
            spec: "-na me".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid comparator field in '-na me'");
    }

    #[test]
    fn test_retryable() {
        let err = CollectionError::Transport {
            message: "connection refused".to_string(),
            status: None,
        };
        assert!(err.is_retryable());

        let err = CollectionError::Transport {
            message: "bad gateway".to_string(),
            status: Some(502),
        };
        assert!(err.is_retryable());

        let err = CollectionError::Transport {
            message: "not found".to_string(),
            status: Some(404),
        };
        assert!(!err.is_retryable());

        assert!(!CollectionError::malformed("x").is_retryable());
    }

    #[test]
    fn test_to_response_details() {
        let err = CollectionError::Transport {
            message: "unavailable".to_string(),
            status: Some(503),
        };
        let response = err.to_response();
        assert_eq!(response.code, "TRANSPORT_ERROR");
        assert_eq!(response.details, Some(serde_json::json!({ "status": 503 })));

        let response = CollectionError::malformed("x").to_response();
        assert!(response.details.is_none());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
    }
}
