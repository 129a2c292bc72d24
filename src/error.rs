//! Error types for td
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task, missing data dir)
//! - 3: Gate denial (login failed, username taken, not logged in)
//! - 4: Operation failed (IO, serialization, lock timeout)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the td CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const GATE_DENIED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for td operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Data directory could not be determined; pass --data-dir or set TD_DATA_DIR")]
    DataDirUnavailable,

    #[error("Not initialized: {0} (run `td init`)")]
    NotInitialized(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // Gate denials (exit code 3)
    #[error("Username already taken: {0}")]
    AccountExists(String),

    #[error("Login failed for {0}")]
    LoginFailed(String),

    #[error("Not logged in")]
    NotLoggedIn,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::DataDirUnavailable
            | Error::NotInitialized(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::TaskNotFound(_)
            | Error::AccountNotFound(_) => exit_codes::USER_ERROR,

            // Gate denials
            Error::AccountExists(_) | Error::LoginFailed(_) | Error::NotLoggedIn => {
                exit_codes::GATE_DENIED
            }

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for td operations
pub type Result<T> = std::result::Result<T, Error>;
