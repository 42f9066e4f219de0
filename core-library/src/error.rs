use bridge_traits::error::BridgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Cannot read {path}: {message}")]
    FileAccess { path: String, message: String },

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl LibraryError {
    pub fn track_not_found(path: impl Into<String>) -> Self {
        LibraryError::NotFound {
            entity_type: "Track".to_string(),
            id: path.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        LibraryError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Boundary classification used when the failure is reported to the host.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::Database(_) | LibraryError::Migration(_) => ErrorKind::Storage,
            LibraryError::Bridge(BridgeError::Io(_)) => ErrorKind::FileAccess,
            LibraryError::Bridge(BridgeError::DatabaseError(_))
            | LibraryError::Bridge(BridgeError::OperationFailed(_)) => ErrorKind::Storage,
            LibraryError::Bridge(BridgeError::NotAvailable(_)) => ErrorKind::Unknown,
            LibraryError::FileAccess { .. } => ErrorKind::FileAccess,
            LibraryError::InvalidInput { .. } => ErrorKind::Validation,
            LibraryError::NotFound { .. } => ErrorKind::NotFound,
            LibraryError::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

/// Error categories surfaced across the engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The persistent store failed
    Storage,
    /// An import path could not be read
    FileAccess,
    /// The request itself was malformed
    Validation,
    /// The referenced track is not in the store
    NotFound,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Storage => "storage",
            ErrorKind::FileAccess => "file_access",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Storage => "The music library could not be accessed. Please try again.",
            ErrorKind::FileAccess => "Some files could not be read. Check that they still exist.",
            ErrorKind::Validation => "The request was not valid.",
            ErrorKind::NotFound => "That track is no longer in your library.",
            ErrorKind::Unknown => "Something went wrong.",
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
