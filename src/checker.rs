//! Runs one streaming hasher per requested algorithm against a single file.
//!
//! Workers run on tokio's blocking pool and publish everything they have to say
//! over a per-check channel. Starting a new check cancels the previous one, and
//! because each check owns its channel, a superseded check can never leak events
//! into its successor's stream.

use crate::cancel::CancellationSignal;
use crate::config::CheckConfig;
use crate::error::{ConfigError, IoFailure};
use crate::file_ops::compute_file_hash_with_progress;
use crate::models::{Algorithm, AlgorithmReport, CheckReport, Digest, HashOutcome, ProgressEvent};
use crate::utils::match_status;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug)]
pub enum CheckEventKind {
    /// The algorithm was not requested; any result shown for it is stale.
    Cleared,
    Progress(ProgressEvent),
    /// Sent exactly once per started task, after all of its progress events.
    Finished(HashOutcome),
}

#[derive(Debug)]
pub struct CheckEvent {
    pub session: Uuid,
    pub algorithm: Algorithm,
    pub kind: CheckEventKind,
}

pub struct Checker {
    block_size: usize,
    current: Mutex<CancellationSignal>,
}

impl Checker {
    pub fn new(config: &CheckConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Checker {
            block_size: config.block_size,
            current: Mutex::new(CancellationSignal::new()),
        })
    }

    /// Start hashing `path` with every algorithm in `selected` and return at once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_check(&self, path: impl Into<PathBuf>, selected: &[Algorithm]) -> CheckSession {
        let path = path.into();
        let cancel = self.supersede();
        let id = Uuid::new_v4();
        let selected: BTreeSet<Algorithm> = selected.iter().copied().collect();
        info!(session = %id, path = %path.display(), algorithms = ?selected, "check started");

        let (tx, rx) = mpsc::unbounded_channel();
        for algorithm in Algorithm::all() {
            if !selected.contains(&algorithm) {
                let _ = tx.send(CheckEvent {
                    session: id,
                    algorithm,
                    kind: CheckEventKind::Cleared,
                });
                continue;
            }

            let worker = tokio::task::spawn_blocking({
                let tx = tx.clone();
                let cancel = cancel.clone();
                let path = path.clone();
                let block_size = self.block_size;
                move || {
                    compute_file_hash_with_progress(&path, algorithm, &cancel, block_size, |event| {
                        let _ = tx.send(CheckEvent {
                            session: id,
                            algorithm,
                            kind: CheckEventKind::Progress(event),
                        });
                    })
                }
            });

            let tx = tx.clone();
            let path = path.clone();
            tokio::spawn(async move {
                let outcome = match worker.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(session = %id, %algorithm, "hash worker died: {e}");
                        HashOutcome::Failed(IoFailure::aborted(path, e.to_string()))
                    }
                };
                let _ = tx.send(CheckEvent {
                    session: id,
                    algorithm,
                    kind: CheckEventKind::Finished(outcome),
                });
            });
        }

        CheckSession {
            id,
            path,
            started_at: Utc::now(),
            cancel,
            events: rx,
        }
    }

    /// Cancel whatever check is current. Idempotent.
    pub fn request_cancel(&self) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if !current.is_cancelled() {
            info!("cancellation requested");
        }
        current.cancel();
    }

    /// Run a check to completion.
    pub async fn check(&self, path: impl Into<PathBuf>, selected: &[Algorithm]) -> CheckResults {
        self.start_check(path, selected).collect().await
    }

    fn supersede(&self) -> CancellationSignal {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if !current.is_cancelled() {
            debug!("superseding previous check");
        }
        current.cancel();
        *current = CancellationSignal::new();
        current.clone()
    }
}

/// Handle on one running check. Dropping it discards the events; the workers
/// still run until they finish or are cancelled.
pub struct CheckSession {
    id: Uuid,
    path: PathBuf,
    started_at: DateTime<Utc>,
    cancel: CancellationSignal,
    events: mpsc::UnboundedReceiver<CheckEvent>,
}

impl CheckSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cancel this check only.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Next event, or `None` once every task has reported its outcome.
    pub async fn next_event(&mut self) -> Option<CheckEvent> {
        self.events.recv().await
    }

    pub fn results(&self) -> CheckResults {
        CheckResults {
            id: self.id,
            path: self.path.clone(),
            started_at: self.started_at,
            finished_at: None,
            outcomes: BTreeMap::new(),
        }
    }

    pub async fn collect(mut self) -> CheckResults {
        let mut results = self.results();
        while let Some(event) = self.next_event().await {
            results.record(event);
        }
        results.finish();
        results
    }
}

/// Outcomes of one check, keyed by algorithm.
#[derive(Debug)]
pub struct CheckResults {
    id: Uuid,
    path: PathBuf,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    outcomes: BTreeMap<Algorithm, HashOutcome>,
}

impl CheckResults {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Fold an event in. Events from another session are ignored.
    pub fn record(&mut self, event: CheckEvent) {
        if event.session != self.id {
            debug!(session = %event.session, "dropping event from superseded check");
            return;
        }
        match event.kind {
            CheckEventKind::Cleared => {
                self.outcomes.insert(event.algorithm, HashOutcome::NotRequested);
            }
            CheckEventKind::Finished(outcome) => {
                self.outcomes.insert(event.algorithm, outcome);
            }
            CheckEventKind::Progress(_) => {}
        }
    }

    pub fn finish(&mut self) {
        self.finished_at.get_or_insert_with(Utc::now);
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&HashOutcome> {
        self.outcomes.get(&algorithm)
    }

    pub fn digest(&self, algorithm: Algorithm) -> Option<&Digest> {
        self.get(algorithm).and_then(HashOutcome::digest)
    }

    /// Every supported algorithm has a terminal outcome.
    pub fn is_complete(&self) -> bool {
        Algorithm::all().iter().all(|a| self.outcomes.contains_key(a))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &HashOutcome)> {
        self.outcomes.iter().map(|(a, o)| (*a, o))
    }

    pub fn into_report(self, expected: Option<&Digest>) -> CheckReport {
        let finished_at = self.finished_at.unwrap_or_else(Utc::now);
        let not_requested = HashOutcome::NotRequested;
        let results = Algorithm::all()
            .into_iter()
            .map(|algorithm| {
                let outcome = self.outcomes.get(&algorithm).unwrap_or(&not_requested);
                let digest = outcome.digest().cloned();
                let (error_kind, error) = match outcome {
                    HashOutcome::Failed(failure) => (Some(failure.kind), Some(failure.to_string())),
                    _ => (None, None),
                };
                AlgorithmReport {
                    algorithm,
                    status: outcome.status(),
                    matches: match_status(expected, digest.as_ref()),
                    digest,
                    error_kind,
                    error,
                }
            })
            .collect();

        CheckReport {
            id: self.id.to_string(),
            file_path: self.path,
            expected: expected.map(Digest::to_hex),
            started_at: self.started_at,
            finished_at,
            results,
        }
    }
}
