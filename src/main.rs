use anyhow::{bail, Context, Result};
use clap::Parser;
use hashcheck::console::{self, Console};
use hashcheck::logging::init_tracing;
use hashcheck::utils::parse_first_hash_from_text;
use hashcheck::{Algorithm, CheckConfig, Checker, Digest, DEFAULT_BLOCK_SIZE};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute and compare MD5, SHA-1, SHA-256 and SHA-512 digests of a file.
#[derive(Parser, Debug)]
#[command(name = "hashcheck", version, about)]
struct Cli {
    /// File to hash
    file: PathBuf,

    /// Algorithm to compute; repeat for several (default: md5, sha1, sha256, sha512)
    #[arg(short, long = "algorithm", value_name = "ALG")]
    algorithms: Vec<Algorithm>,

    /// Compute every supported algorithm, including sha3-256 and blake3
    #[arg(long, conflicts_with = "algorithms")]
    all: bool,

    /// Expected hash to compare every result against
    #[arg(short, long, value_name = "HEX", conflicts_with = "expected_file")]
    expected: Option<String>,

    /// Read the expected hash from a checksum file
    #[arg(long, value_name = "FILE")]
    expected_file: Option<PathBuf>,

    /// Read granularity in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Do not draw progress bars
    #[arg(long)]
    no_progress: bool,

    /// Debug logging (overridden by HASHCHECK_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn selected(&self) -> Vec<Algorithm> {
        if self.all {
            Algorithm::all()
        } else if self.algorithms.is_empty() {
            Algorithm::defaults()
        } else {
            self.algorithms.clone()
        }
    }

    fn expected_digest(&self) -> Result<Option<Digest>> {
        let text = match (&self.expected, &self.expected_file) {
            (Some(hex), _) => hex.clone(),
            (None, Some(path)) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("reading checksum file {}", path.display()))?;
                match parse_first_hash_from_text(&contents) {
                    Some(hash) => hash,
                    None => bail!("no hash found in {}", path.display()),
                }
            }
            (None, None) => return Ok(None),
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let digest = Digest::from_hex(text)
            .with_context(|| format!("expected hash {text:?} is not valid hex"))?;
        Ok(Some(digest))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let expected = cli.expected_digest()?;
    let config = CheckConfig::default()
        .with_block_size(cli.block_size)
        .with_algorithms(cli.selected());
    let checker = Checker::new(&config).context("invalid configuration")?;

    let mut progress = Console::new(&config.algorithms, !cli.no_progress && !cli.json);
    let mut session = checker.start_check(cli.file.clone(), &config.algorithms);
    let mut results = session.results();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;
    loop {
        tokio::select! {
            event = session.next_event() => match event {
                Some(event) => {
                    progress.on_event(&event);
                    results.record(event);
                }
                None => break,
            },
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                checker.request_cancel();
            }
        }
    }
    results.finish();
    progress.finish();

    let report = results.into_report(expected.as_ref());
    let mut stdout = io::stdout().lock();
    if cli.json {
        console::print_json(&report, &mut stdout)?;
    } else {
        console::print_report(&report, &mut stdout)?;
    }
    Ok(console::exit_code(&report))
}
