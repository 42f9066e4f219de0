use core_library::{ErrorKind, LibraryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
}

impl CoreError {
    /// Boundary classification reported in failure events.
    ///
    /// A missing capability or bad configuration means the request could not
    /// be served as made, so it counts as a validation failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Library(err) => err.kind(),
            CoreError::Runtime(core_runtime::Error::Config(_))
            | CoreError::Runtime(core_runtime::Error::CapabilityMissing { .. }) => {
                ErrorKind::Validation
            }
            CoreError::Runtime(core_runtime::Error::Internal(_))
            | CoreError::InitializationFailed(_) => ErrorKind::Unknown,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
