use crate::cancel::CancellationSignal;
use crate::error::IoFailure;
use crate::hashers::Hasher;
use crate::models::{Algorithm, Digest, HashOutcome, ProgressEvent};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Compute the digest of the file at `path` without progress reporting.
/// Blocking; run it on a worker thread.
pub fn compute_file_hash(
    path: &Path,
    algorithm: Algorithm,
    cancel: &CancellationSignal,
    block_size: usize,
) -> HashOutcome {
    compute_file_hash_with_progress(path, algorithm, cancel, block_size, |_| {})
}

/// Compute the digest of the file at `path`, calling `on_progress` after every block.
///
/// The file gets its own handle and `algorithm` its own fresh accumulator, so
/// any number of these may run against the same file at once. Errors never
/// escape: they come back as `HashOutcome::Failed`.
pub fn compute_file_hash_with_progress<F>(
    path: &Path,
    algorithm: Algorithm,
    cancel: &CancellationSignal,
    block_size: usize,
    on_progress: F,
) -> HashOutcome
where
    F: FnMut(ProgressEvent),
{
    if cancel.is_cancelled() {
        return HashOutcome::Cancelled;
    }

    let started = Instant::now();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return failed(algorithm, IoFailure::new(e, "opening", path)),
    };
    // Size is sampled once; growth during the read is not tracked.
    let total_size = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(e) => return failed(algorithm, IoFailure::new(e, "inspecting", path)),
    };
    debug!(%algorithm, path = %path.display(), total_size, "hashing started");

    let hasher = algorithm.hasher();
    match compute_hash_for_reader(file, hasher, total_size, cancel, block_size, on_progress) {
        Ok(Some(digest)) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            debug!(%algorithm, elapsed_ms, "hashing finished");
            HashOutcome::Complete(digest)
        }
        Ok(None) => {
            debug!(%algorithm, path = %path.display(), "hashing cancelled");
            HashOutcome::Cancelled
        }
        Err(e) => failed(algorithm, IoFailure::new(e, "reading", path)),
    }
}

fn failed(algorithm: Algorithm, failure: IoFailure) -> HashOutcome {
    warn!(%algorithm, kind = ?failure.kind, "{failure}");
    HashOutcome::Failed(failure)
}

/// Stream `reader` through `hasher` in blocks of `block_size` bytes.
///
/// Every byte is fed exactly once and in order. Returns `Ok(None)` when `cancel`
/// was observed; nothing is fed after that point and no digest is produced.
pub fn compute_hash_for_reader<R, F>(
    mut reader: R,
    mut hasher: Box<dyn Hasher>,
    total_size: u64,
    cancel: &CancellationSignal,
    block_size: usize,
    mut on_progress: F,
) -> io::Result<Option<Digest>>
where
    R: Read,
    F: FnMut(ProgressEvent),
{
    if cancel.is_cancelled() {
        return Ok(None);
    }

    let mut buf = vec![0u8; block_size.max(1)];
    let mut bytes_read = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        bytes_read += n as u64;
        on_progress(ProgressEvent::new(bytes_read, total_size));

        if cancel.is_cancelled() {
            return Ok(None);
        }
    }

    if cancel.is_cancelled() {
        return Ok(None);
    }
    Ok(Some(hasher.finalize()))
}
