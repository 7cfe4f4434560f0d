//! Tracing subscriber setup for the command line.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str =
    "filedeck=info,filedeck_core=info,filedeck_scan=info,filedeck_ops=info,warn";
const VERBOSE_FILTER: &str =
    "filedeck=debug,filedeck_core=debug,filedeck_scan=debug,filedeck_ops=debug,info";

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Output goes to stderr so listings and JSON on stdout stay clean.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
