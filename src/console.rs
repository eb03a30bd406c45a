use crate::checker::{CheckEvent, CheckEventKind};
use crate::models::{Algorithm, CheckReport, MatchStatus, OutcomeStatus};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::BTreeMap;
use std::io::{self, Write};

const BAR_TEMPLATE: &str = "{prefix:>9} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}";

/// Terminal front end: one progress bar per running algorithm.
pub struct Console {
    multi: MultiProgress,
    bars: BTreeMap<Algorithm, ProgressBar>,
}

impl Console {
    pub fn new(selected: &[Algorithm], show_progress: bool) -> Self {
        let multi = if show_progress {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let mut bars = BTreeMap::new();
        for &algorithm in selected {
            if bars.contains_key(&algorithm) {
                continue;
            }
            let bar = multi.add(ProgressBar::new(0));
            bar.set_style(style.clone());
            bar.set_prefix(algorithm.name());
            bar.set_message("calculating...");
            bars.insert(algorithm, bar);
        }
        Console { multi, bars }
    }

    pub fn on_event(&mut self, event: &CheckEvent) {
        let Some(bar) = self.bars.get(&event.algorithm) else {
            return;
        };
        match &event.kind {
            CheckEventKind::Progress(progress) => {
                if bar.length() != Some(progress.total_size) {
                    bar.set_length(progress.total_size);
                }
                bar.set_position(progress.bytes_read);
                bar.set_message(format!("{}%", progress.percentage()));
            }
            CheckEventKind::Finished(_) => bar.finish_and_clear(),
            CheckEventKind::Cleared => {}
        }
    }

    pub fn finish(&self) {
        for bar in self.bars.values() {
            bar.finish_and_clear();
        }
        let _ = self.multi.clear();
    }
}

/// One line per shown algorithm: name, digest (blank when there is none), verdict.
pub fn print_report<W: Write>(report: &CheckReport, out: &mut W) -> io::Result<()> {
    for entry in &report.results {
        let digest = entry.digest.as_ref().map(|d| d.to_hex()).unwrap_or_default();
        let note = match entry.status {
            OutcomeStatus::NotRequested => continue,
            OutcomeStatus::Complete => match entry.matches {
                MatchStatus::Match => "  MATCH".to_string(),
                MatchStatus::Mismatch => "  MISMATCH".to_string(),
                MatchStatus::Unchecked => String::new(),
            },
            OutcomeStatus::Cancelled => "(cancelled)".to_string(),
            OutcomeStatus::Failed => {
                format!("(failed: {})", entry.error.as_deref().unwrap_or("unknown error"))
            }
        };
        writeln!(out, "{:<9}{}{}", entry.algorithm.name(), digest, note)?;
    }
    Ok(())
}

pub fn print_json<W: Write>(report: &CheckReport, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

/// 130 cancelled, 2 any failure, 1 expected hash given but nothing matched, else 0.
pub fn exit_code(report: &CheckReport) -> u8 {
    if report.was_cancelled() {
        130
    } else if report.has_failure() {
        2
    } else if report.expected.is_some() && !report.has_match() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoFailureKind;
    use crate::models::{AlgorithmReport, Digest};
    use chrono::Utc;
    use std::path::PathBuf;

    fn complete(algorithm: Algorithm, hex: &str, matches: MatchStatus) -> AlgorithmReport {
        AlgorithmReport {
            algorithm,
            status: OutcomeStatus::Complete,
            digest: Some(Digest::from_hex(hex).unwrap()),
            error_kind: None,
            error: None,
            matches,
        }
    }

    fn without_digest(algorithm: Algorithm, status: OutcomeStatus) -> AlgorithmReport {
        AlgorithmReport {
            algorithm,
            status,
            digest: None,
            error_kind: None,
            error: None,
            matches: MatchStatus::Unchecked,
        }
    }

    fn failed(algorithm: Algorithm) -> AlgorithmReport {
        AlgorithmReport {
            error_kind: Some(IoFailureKind::NotFound),
            error: Some("opening file.bin: not found".to_string()),
            ..without_digest(algorithm, OutcomeStatus::Failed)
        }
    }

    fn report(results: Vec<AlgorithmReport>, expected: Option<&str>) -> CheckReport {
        CheckReport {
            id: "test".to_string(),
            file_path: PathBuf::from("file.bin"),
            expected: expected.map(str::to_string),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            results,
        }
    }

    #[test]
    fn report_lines_hide_unrequested_and_blank_failed() {
        let report = report(
            vec![
                complete(Algorithm::Md5, "abcd", MatchStatus::Match),
                without_digest(Algorithm::Sha1, OutcomeStatus::Cancelled),
                without_digest(Algorithm::Sha256, OutcomeStatus::NotRequested),
                complete(Algorithm::Sha512, "0000", MatchStatus::Mismatch),
                failed(Algorithm::Blake3),
            ],
            Some("abcd"),
        );
        let mut out = Vec::new();
        print_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "MD5      abcd  MATCH\n\
             SHA-1    (cancelled)\n\
             SHA-512  0000  MISMATCH\n\
             BLAKE3   (failed: opening file.bin: not found)\n"
        );
    }

    #[test]
    fn json_report_uses_hex_digests() {
        let report = report(vec![complete(Algorithm::Md5, "abcd", MatchStatus::Unchecked)], None);
        let mut out = Vec::new();
        print_json(&report, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["results"][0]["digest"], "abcd");
        assert_eq!(value["results"][0]["algorithm"], "md5");
        assert_eq!(value["results"][0]["status"], "complete");
    }

    #[test]
    fn exit_codes() {
        let ok = report(vec![complete(Algorithm::Md5, "abcd", MatchStatus::Match)], Some("abcd"));
        assert_eq!(exit_code(&ok), 0);

        let unchecked = report(
            vec![complete(Algorithm::Md5, "abcd", MatchStatus::Unchecked)],
            None,
        );
        assert_eq!(exit_code(&unchecked), 0);

        let miss = report(
            vec![complete(Algorithm::Md5, "abcd", MatchStatus::Mismatch)],
            Some("0000"),
        );
        assert_eq!(exit_code(&miss), 1);

        let cancelled = report(
            vec![without_digest(Algorithm::Md5, OutcomeStatus::Cancelled)],
            None,
        );
        assert_eq!(exit_code(&cancelled), 130);
    }

    #[test]
    fn failure_exits_with_two_even_when_another_algorithm_matched() {
        let broken = report(
            vec![
                complete(Algorithm::Md5, "abcd", MatchStatus::Match),
                failed(Algorithm::Sha1),
            ],
            Some("abcd"),
        );
        assert_eq!(exit_code(&broken), 2);
    }

    #[test]
    fn cancellation_outranks_failure() {
        let both = report(
            vec![
                failed(Algorithm::Md5),
                without_digest(Algorithm::Sha1, OutcomeStatus::Cancelled),
            ],
            None,
        );
        assert_eq!(exit_code(&both), 130);
    }
}
