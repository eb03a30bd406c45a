// Streaming hasher against real files on disk

use hashcheck::{
    compute_file_hash, compute_file_hash_with_progress, hash_bytes, Algorithm, CancellationSignal,
    Digest, HashOutcome, IoFailureKind, DEFAULT_BLOCK_SIZE,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

fn hash_file(path: &Path, algorithm: Algorithm) -> HashOutcome {
    compute_file_hash(path, algorithm, &CancellationSignal::new(), DEFAULT_BLOCK_SIZE)
}

fn file_with(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 253) as u8).collect()
}

#[test]
fn test_file_hash_matches_in_memory_hash() {
    let data = pattern(3 * DEFAULT_BLOCK_SIZE + 17);
    let file = file_with(&data);
    for algorithm in Algorithm::all() {
        for block_size in [1 << 10, DEFAULT_BLOCK_SIZE, 1 << 20] {
            let cancel = CancellationSignal::new();
            let outcome = compute_file_hash(file.path(), algorithm, &cancel, block_size);
            assert_eq!(
                outcome.digest(),
                Some(&hash_bytes(algorithm, &data)),
                "{algorithm} block {block_size}"
            );
        }
    }
}

#[test]
fn test_known_sha256_of_file() {
    let file = file_with(b"hello world");
    let outcome = hash_file(file.path(), Algorithm::Sha256);
    assert_eq!(
        outcome.digest().map(Digest::to_hex).as_deref(),
        Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
    );
}

#[test]
fn test_empty_file_gives_empty_input_digest() {
    let file = file_with(b"");
    let outcome = hash_file(file.path(), Algorithm::Md5);
    assert_eq!(
        outcome.digest().map(Digest::to_hex).as_deref(),
        Some("d41d8cd98f00b204e9800998ecf8427e")
    );
}

#[test]
fn test_progress_reports_file_size_per_block() {
    let data = pattern(DEFAULT_BLOCK_SIZE * 2 + 1);
    let file = file_with(&data);
    let mut events = Vec::new();
    let outcome = compute_file_hash_with_progress(
        file.path(),
        Algorithm::Sha1,
        &CancellationSignal::new(),
        DEFAULT_BLOCK_SIZE,
        |event| events.push(event),
    );
    assert!(matches!(outcome, HashOutcome::Complete(_)));
    assert!(events.iter().all(|e| e.total_size == data.len() as u64));
    assert!(events.windows(2).all(|w| w[0].bytes_read < w[1].bytes_read));
    assert_eq!(events.last().map(|e| e.bytes_read), Some(data.len() as u64));
    assert_eq!(events.last().map(|e| e.percentage()), Some(100));
}

#[test]
fn test_cancel_after_first_block() {
    let data = pattern(DEFAULT_BLOCK_SIZE * 4);
    let file = file_with(&data);
    let cancel = CancellationSignal::new();
    let mut blocks = 0;
    let outcome = compute_file_hash_with_progress(
        file.path(),
        Algorithm::Sha512,
        &cancel,
        DEFAULT_BLOCK_SIZE,
        |_| {
            blocks += 1;
            cancel.cancel();
        },
    );
    assert!(outcome.is_cancelled());
    assert!(outcome.digest().is_none());
    assert_eq!(blocks, 1);
}

#[test]
fn test_cancelled_before_start_does_not_open() {
    let dir = tempdir().unwrap();
    let cancel = CancellationSignal::new();
    cancel.cancel();
    let missing = dir.path().join("missing");
    let outcome = compute_file_hash(&missing, Algorithm::Md5, &cancel, DEFAULT_BLOCK_SIZE);
    assert!(outcome.is_cancelled());
}

#[test]
fn test_missing_file_is_io_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.bin");
    match hash_file(&path, Algorithm::Sha256) {
        HashOutcome::Failed(failure) => {
            assert_eq!(failure.kind, IoFailureKind::NotFound);
            assert_eq!(failure.path, path);
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_directory_is_io_failure() {
    let dir = tempdir().unwrap();
    let outcome = hash_file(dir.path(), Algorithm::Md5);
    assert!(outcome.is_failed());
}

#[test]
fn test_hash_does_not_lock_file() {
    let file = file_with(b"shared");
    // Another reader holding the file open must not get in the way.
    let _other = fs::File::open(file.path()).unwrap();
    let outcome = hash_file(file.path(), Algorithm::Md5);
    assert_eq!(outcome.digest(), Some(&hash_bytes(Algorithm::Md5, b"shared")));
}
