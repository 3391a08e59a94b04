//! Unified error type for the bisque library.
//!
//! Library code returns `BisqueError`; CLI command handlers use
//! `anyhow::Result` for convenience and wrap these with path context.
//!
//! # Error Categories
//!
//! - **Io**: File system operations (open, read, write, mmap)
//! - **Format**: Invalid file content (magic bytes, version, impossible fields)
//! - **Mismatch**: Inconsistent parameters between files that must agree
//! - **Truncated**: File body shorter than its header declares
//! - **Validation**: Invalid parameters or arguments

use std::fmt;
use std::path::PathBuf;

/// Unified error type for the bisque library.
#[derive(Debug)]
pub enum BisqueError {
    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
    },

    /// Invalid file format (magic bytes, version, impossible field values).
    Format { path: PathBuf, detail: String },

    /// Mismatched parameters between files that must share them
    /// (signature size or hash count across combine inputs or query indices).
    Mismatch {
        path: PathBuf,
        field: &'static str,
        expected: u64,
        found: u64,
    },

    /// File shorter than its header declares.
    Truncated {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    /// Validation error (invalid parameters, data invariants).
    Validation(String),
}

impl fmt::Display for BisqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BisqueError::Io {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "I/O error during {} on '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            BisqueError::Format { path, detail } => {
                write!(f, "Invalid format in '{}': {}", path.display(), detail)
            }
            BisqueError::Mismatch {
                path,
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Header mismatch in '{}': {} is {}, expected {}",
                    path.display(),
                    field,
                    found,
                    expected
                )
            }
            BisqueError::Truncated {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Truncated file '{}': expected {} body bytes, found {}",
                    path.display(),
                    expected,
                    found
                )
            }
            BisqueError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for BisqueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BisqueError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BisqueError {
    fn from(err: std::io::Error) -> Self {
        BisqueError::Io {
            path: PathBuf::new(),
            operation: "unknown",
            source: err,
        }
    }
}

/// Convenience type alias for Results using BisqueError.
pub type Result<T> = std::result::Result<T, BisqueError>;

impl BisqueError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        BisqueError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create a format error.
    pub fn format(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        BisqueError::Format {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Create a header-mismatch error.
    pub fn mismatch(
        path: impl Into<PathBuf>,
        field: &'static str,
        expected: u64,
        found: u64,
    ) -> Self {
        BisqueError::Mismatch {
            path: path.into(),
            field,
            expected,
            found,
        }
    }

    /// Create a truncation error.
    pub fn truncated(path: impl Into<PathBuf>, expected: u64, found: u64) -> Self {
        BisqueError::Truncated {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        BisqueError::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = BisqueError::io(
            "/path/to/index.bqx",
            "read",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/path/to/index.bqx"));
        assert!(msg.contains("read"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_format_error_display() {
        let err = BisqueError::format("/path/to/index.bqx", "magic mismatch");
        let msg = err.to_string();
        assert!(msg.contains("/path/to/index.bqx"));
        assert!(msg.contains("magic mismatch"));
    }

    #[test]
    fn test_mismatch_error_display() {
        let err = BisqueError::mismatch("/b2.bqx", "signature_size", 1024, 2048);
        let msg = err.to_string();
        assert!(msg.contains("signature_size"));
        assert!(msg.contains("1024"));
        assert!(msg.contains("2048"));
    }

    #[test]
    fn test_truncated_error_display() {
        let err = BisqueError::truncated("/b.bqx", 4096, 100);
        let msg = err.to_string();
        assert!(msg.contains("4096"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err = BisqueError::io("/path", "open", io_err);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: BisqueError = io_err.into();
        match err {
            BisqueError::Io { operation, .. } => assert_eq!(operation, "unknown"),
            _ => panic!("Expected Io variant"),
        }
    }
}
