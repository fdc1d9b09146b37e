//! Error types for sqlscaffold

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for file I/O failures.
pub const EXIT_FILE: i32 = 2;
/// Exit code for validation failures.
pub const EXIT_VALIDATION: i32 = 3;

/// Errors that can occur while scaffolding models from DDL input.
///
/// Each variant carries the input it belongs to, so failures across
/// multiple inputs stay attributable. The core pipeline itself never
/// produces errors for malformed SQL; everything here is raised by the
/// driver layer around it.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Error reading SQL file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing model file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQL statement for '{input}' cannot be empty")]
    EmptyInput { input: String },

    #[error("Invalid SQL in '{input}': {message}")]
    Validation { input: String, message: String },

    #[error("{language} generator is not implemented yet")]
    UnsupportedLanguage { language: String },
}

impl ScaffoldError {
    /// The process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::FileRead { .. } | ScaffoldError::FileWrite { .. } => EXIT_FILE,
            ScaffoldError::EmptyInput { .. }
            | ScaffoldError::Validation { .. }
            | ScaffoldError::UnsupportedLanguage { .. } => EXIT_VALIDATION,
        }
    }
}
