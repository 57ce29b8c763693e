use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// actix's request logger goes through the `log` facade and is bridged
/// into the same output.
pub fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "tennis_signup=debug,actix_web=info"
    } else {
        "tennis_signup=info,actix_web=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
