use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const APP_TARGETS: [&str; 3] = ["personal_analyzers", "finance_analyzer", "time_analyzer"];

/// Filter used when `RUST_LOG` is unset: warnings everywhere, and the
/// analyzers' own debug trail when `verbose` is on.
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    let mut directives = vec!["warn".to_string()];
    directives.extend(APP_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// `RUST_LOG`, when set, replaces the default filter entirely.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().compact().without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
