use crate::error::{IoFailure, IoFailureKind, ParseError, UnknownAlgorithm};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    #[serde(rename = "sha3-256")]
    Sha3_256,
    Blake3,
}

impl Algorithm {
    pub fn all() -> Vec<Algorithm> {
        vec![
            Algorithm::Md5,
            Algorithm::Sha1,
            Algorithm::Sha256,
            Algorithm::Sha512,
            Algorithm::Sha3_256,
            Algorithm::Blake3,
        ]
    }

    /// The selection used when the caller does not pick algorithms explicitly.
    pub fn defaults() -> Vec<Algorithm> {
        vec![Algorithm::Md5, Algorithm::Sha1, Algorithm::Sha256, Algorithm::Sha512]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA-1",
            Algorithm::Sha256 => "SHA-256",
            Algorithm::Sha512 => "SHA-512",
            Algorithm::Sha3_256 => "SHA3-256",
            Algorithm::Blake3 => "BLAKE3",
        }
    }

    /// Native digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
            Algorithm::Sha512 => 64,
            Algorithm::Sha3_256 => 32,
            Algorithm::Blake3 => 32,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" => Ok(Algorithm::Sha1),
            "sha256" => Ok(Algorithm::Sha256),
            "sha512" => Ok(Algorithm::Sha512),
            "sha3256" => Ok(Algorithm::Sha3_256),
            "blake3" => Ok(Algorithm::Blake3),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Output of a completed hash computation. Immutable once built.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Box<[u8]>);

impl Digest {
    pub fn from_hex(s: &str) -> Result<Digest, ParseError> {
        // Positions are in characters; `hex` would report UTF-8 bytes.
        if let Some((index, ch)) = s.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
            return Err(ParseError::InvalidCharacter { ch, index });
        }
        if s.len() % 2 != 0 {
            return Err(ParseError::OddLength(s.len()));
        }
        hex::decode(s).map(Digest::from).map_err(|err| match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                ParseError::InvalidCharacter { ch: c, index }
            }
            _ => ParseError::OddLength(s.len()),
        })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Digest(bytes.into_boxed_slice())
    }
}

impl From<&[u8]> for Digest {
    fn from(bytes: &[u8]) -> Self {
        Digest(bytes.into())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Cumulative progress of one streaming pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub bytes_read: u64,
    pub total_size: u64,
}

impl ProgressEvent {
    pub fn new(bytes_read: u64, total_size: u64) -> Self {
        ProgressEvent {
            bytes_read,
            total_size,
        }
    }

    /// Truncated percentage. Not clamped: a file that grows while being read
    /// reports more than 100.
    pub fn percentage(&self) -> u64 {
        if self.total_size == 0 {
            return 100;
        }
        (u128::from(self.bytes_read) * 100 / u128::from(self.total_size)) as u64
    }
}

/// Terminal state of one algorithm within a check.
#[derive(Debug)]
pub enum HashOutcome {
    Complete(Digest),
    Cancelled,
    Failed(IoFailure),
    NotRequested,
}

impl HashOutcome {
    /// Only a completed computation has something to show.
    pub fn digest(&self) -> Option<&Digest> {
        match self {
            HashOutcome::Complete(digest) => Some(digest),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, HashOutcome::Cancelled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, HashOutcome::Failed(_))
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            HashOutcome::Complete(_) => OutcomeStatus::Complete,
            HashOutcome::Cancelled => OutcomeStatus::Cancelled,
            HashOutcome::Failed(_) => OutcomeStatus::Failed,
            HashOutcome::NotRequested => OutcomeStatus::NotRequested,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Complete,
    Cancelled,
    Failed,
    NotRequested,
}

/// Result of comparing a computed digest with a user-supplied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Unchecked,
    Match,
    Mismatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmReport {
    pub algorithm: Algorithm,
    pub status: OutcomeStatus,
    pub digest: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<IoFailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub matches: MatchStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub id: String,
    pub file_path: PathBuf,
    pub expected: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub finished_at: chrono::DateTime<chrono::Utc>,
    pub results: Vec<AlgorithmReport>,
}

impl CheckReport {
    pub fn has_mismatch(&self) -> bool {
        self.results.iter().any(|r| r.matches == MatchStatus::Mismatch)
    }

    pub fn has_match(&self) -> bool {
        self.results.iter().any(|r| r.matches == MatchStatus::Match)
    }

    pub fn has_failure(&self) -> bool {
        self.results.iter().any(|r| r.status == OutcomeStatus::Failed)
    }

    pub fn was_cancelled(&self) -> bool {
        self.results.iter().any(|r| r.status == OutcomeStatus::Cancelled)
    }
}
