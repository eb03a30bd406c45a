//! Concurrent multi-algorithm file hashing with progress and cancellation.
//!
//! [`checker::Checker`] runs one streaming hasher per algorithm against a
//! single file and reports progress and outcomes over a channel.

pub mod cancel;
pub mod checker;
pub mod config;
pub mod console;
pub mod error;
pub mod file_ops;
pub mod hashers;
pub mod logging;
pub mod models;
pub mod utils;

pub use cancel::CancellationSignal;
pub use checker::{CheckEvent, CheckEventKind, CheckResults, CheckSession, Checker};
pub use config::{CheckConfig, DEFAULT_BLOCK_SIZE};
pub use error::{ConfigError, IoFailure, IoFailureKind, ParseError, UnknownAlgorithm};
pub use file_ops::{
    compute_file_hash, compute_file_hash_with_progress, compute_hash_for_reader,
};
pub use hashers::{hash_bytes, Hasher};
pub use models::{
    Algorithm, CheckReport, Digest, HashOutcome, MatchStatus, OutcomeStatus, ProgressEvent,
};
