//! Error types for pose sampling and the optimizer bridge.

use std::path::Path;

use thiserror::Error;

/// Errors raised while obtaining optimized poses.
///
/// All variants are fatal to the control step that triggered the fetch: the
/// manipulated object has no fallback pose.
///
/// IO failures of the optimizer bridge come in two variants: [`Io`](Self::Io)
/// for protocol files and [`ProcessFailed`](Self::ProcessFailed) for a
/// process that cannot be spawned or exits with a nonzero status. Match both,
/// or use [`is_io`](Self::is_io).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptimError {
    /// A response or request line could not be parsed.
    #[error("malformed optimizer data at line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// A protocol file could not be written or read.
    #[error("IO error on {path}: {reason}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        reason: String,
    },

    /// The optimizer process could not be started or exited unsuccessfully.
    ///
    /// Counts as an IO failure for [`is_io`](Self::is_io).
    #[error("optimizer process failed: {0}")]
    ProcessFailed(String),

    /// The optimizer produced no candidate poses.
    #[error("optimizer returned no poses")]
    EmptyResponse,
}

impl OptimError {
    /// Creates a parse error.
    #[must_use]
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Creates an IO error for `path`.
    #[must_use]
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    /// Creates a process failure error.
    #[must_use]
    pub fn process_failed(reason: impl Into<String>) -> Self {
        Self::ProcessFailed(reason.into())
    }

    /// Check if this is a parse error.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if this is an IO failure: a protocol file error or a failed
    /// optimizer process.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::ProcessFailed(_))
    }
}

/// Result type for optimizer operations.
pub type Result<T> = std::result::Result<T, OptimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OptimError::parse(3, "expected 6 values, got 5");
        assert!(err.to_string().contains("line 3"));
        assert!(err.is_parse());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = OptimError::io(Path::new("/tmp/response.txt"), &io_err);
        assert!(err.to_string().contains("response.txt"));
        assert!(err.is_io());

        assert!(OptimError::process_failed("exit status: 2").is_io());
        assert!(!OptimError::EmptyResponse.is_io());
    }
}
