use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `HASHCHECK_LOG=hashcheck=debug`.
pub const LOG_ENV: &str = "HASHCHECK_LOG";

/// Install the global subscriber. Logs go to stderr so stdout only carries results.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "hashcheck=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
