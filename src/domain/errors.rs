//! Domain error types
//!
//! This module defines the error hierarchy for hybridconn. Transport failures
//! are described by [`ArmError`] and never expose the HTTP client's types.

use crate::domain::ids::HybridConnectionId;
use thiserror::Error;

/// Main hybridconn error type
///
/// Every lifecycle operation returns this type. Variants carry the resource
/// names and the underlying cause so that callers can report them verbatim.
#[derive(Debug, Error)]
pub enum HybridConnError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One or more declared fields failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The relay reference could not be parsed into a namespace and relay name
    #[error("Error parsing relay ID {relay_id:?}: {reason}")]
    InvalidReference { relay_id: String, reason: String },

    /// A remote object already exists for a newly declared resource
    #[error(
        "A resource with the ID {id:?} already exists - to be managed via this tool \
         it needs to be imported into the state"
    )]
    AlreadyExists { id: String },

    /// The existence check before create failed for a reason other than not-found
    #[error("Error checking for presence of existing App Service Hybrid Connection {0}")]
    PrecheckFailed(String),

    /// A persisted identifier could not be parsed
    #[error("Malformed identifier {id:?}: {reason}")]
    MalformedIdentifier { id: String, reason: String },

    /// A remote create, read or delete call failed
    #[error("{0}")]
    RemoteOperationFailed(String),

    /// The upsert succeeded but the concluding read did not
    ///
    /// `id` identifies the stored object and must still be recorded.
    #[error("App Service Hybrid Connection {id} was stored but could not be read back: {source}")]
    StoredButUnread {
        id: HybridConnectionId,
        #[source]
        source: Box<HybridConnError>,
    },

    /// An import target does not exist remotely
    #[error("Cannot import non-existent remote object {0:?}")]
    ImportNotFound(String),

    /// The operation exceeded its deadline
    #[error("Timeout while waiting for {operation} to complete after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// The operation was interrupted by a stop signal
    #[error("Operation {0} was cancelled")]
    Cancelled(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Persisted state errors
    #[error("State error: {0}")]
    State(String),

    /// Transport-level errors from Azure Resource Manager
    #[error("Azure Resource Manager error: {0}")]
    Arm(#[from] ArmError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Azure Resource Manager transport errors
///
/// `NotFound` is kept apart from the other status errors because the
/// lifecycle operations branch on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArmError {
    /// The remote object does not exist (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client error (4xx other than 404)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// The request never produced a response
    #[error("Failed to connect to Azure Resource Manager: {0}")]
    ConnectionFailed(String),

    /// A response could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// A bearer token could not be acquired
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

impl ArmError {
    /// Returns true if the remote responded with "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArmError::NotFound(_))
    }

    /// Builds the error matching an unsuccessful HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => ArmError::NotFound(message),
            401 | 403 => ArmError::AuthenticationFailed(format!("{status} - {message}")),
            400..=499 => ArmError::ClientError { status, message },
            _ => ArmError::ServerError { status, message },
        }
    }
}

impl HybridConnError {
    /// Returns true for errors caused by invalid configuration or declared fields
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HybridConnError::Configuration(_)
                | HybridConnError::Validation(_)
                | HybridConnError::InvalidReference { .. }
                | HybridConnError::MalformedIdentifier { .. }
        )
    }

    /// Returns true for errors caused by connectivity or credentials
    pub fn is_connection(&self) -> bool {
        match self {
            HybridConnError::StoredButUnread { source, .. } => source.is_connection(),
            other => matches!(
                other,
                HybridConnError::Authentication(_)
                    | HybridConnError::Arm(ArmError::ConnectionFailed(_))
                    | HybridConnError::Arm(ArmError::AuthenticationFailed(_))
            ),
        }
    }

    /// Identifier of an object that exists remotely despite the error
    pub fn stored_id(&self) -> Option<&HybridConnectionId> {
        match self {
            HybridConnError::StoredButUnread { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HybridConnError {
    fn from(err: std::io::Error) -> Self {
        HybridConnError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HybridConnError {
    fn from(err: serde_json::Error) -> Self {
        HybridConnError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for HybridConnError {
    fn from(err: toml::de::Error) -> Self {
        HybridConnError::Configuration(format!("TOML parse error: {err}"))
    }
}
