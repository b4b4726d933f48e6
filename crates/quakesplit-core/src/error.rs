use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Null pointer while dereferencing at address {address:#x}")]
    NullPointer { address: u64 },

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("No memory layout known for game: {0}")]
    UnknownGame(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Whether this error describes memory that could not be read this tick
    /// (as opposed to a configuration problem).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::MemoryReadFailed { .. } | Error::NullPointer { .. } | Error::ModuleNotFound(_)
        )
    }
}
