use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an I/O failure, enough for a caller to tell
/// a missing file from a permissions problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IoFailureKind {
    NotFound,
    AccessDenied,
    Other,
}

impl From<io::ErrorKind> for IoFailureKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => IoFailureKind::NotFound,
            io::ErrorKind::PermissionDenied => IoFailureKind::AccessDenied,
            _ => IoFailureKind::Other,
        }
    }
}

/// Failure to open or read the file being hashed. Reported per algorithm.
#[derive(Debug, Error)]
#[error("{operation} {}: {source}", .path.display())]
pub struct IoFailure {
    pub kind: IoFailureKind,
    pub operation: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl IoFailure {
    pub fn new(source: io::Error, operation: &'static str, path: impl Into<PathBuf>) -> Self {
        IoFailure {
            kind: source.kind().into(),
            operation,
            path: path.into(),
            source,
        }
    }

    /// Failure for a task that died without reporting (panicked worker).
    pub fn aborted(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IoFailure {
            kind: IoFailureKind::Other,
            operation: "hashing",
            path: path.into(),
            source: io::Error::other(reason.into()),
        }
    }
}

/// Malformed hexadecimal input when building a `Digest`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("hex string has odd length {0}")]
    OddLength(usize),
    #[error("invalid hex character {ch:?} at position {index}")]
    InvalidCharacter { ch: char, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown hash algorithm {0:?} (expected one of md5, sha1, sha256, sha512, sha3-256, blake3)"
)]
pub struct UnknownAlgorithm(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("block size must be greater than zero")]
    ZeroBlockSize,
}
