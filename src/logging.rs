use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV: &str = "APIPROBE_LOG";

/// Filter directives, most specific source first: `APIPROBE_LOG`, then
/// `RUST_LOG`, then the verbosity flag.
pub fn filter_directives(verbose: bool, app_env: Option<String>, rust_env: Option<String>) -> String {
    let set = |value: &String| !value.trim().is_empty();
    app_env
        .filter(set)
        .or_else(|| rust_env.filter(set))
        .unwrap_or_else(|| {
            if verbose {
                "apiprobe=debug,warn".to_string()
            } else {
                "warn".to_string()
            }
        })
}

/// Installs the stderr subscriber. Stdout stays reserved for reports.
pub fn init(verbose: bool) {
    let directives = filter_directives(
        verbose,
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::filter_directives;

    #[test]
    fn defaults_follow_verbosity() {
        assert_eq!(filter_directives(false, None, None), "warn");
        assert_eq!(filter_directives(true, None, None), "apiprobe=debug,warn");
    }

    #[test]
    fn app_variable_wins_over_rust_log() {
        let directives =
            filter_directives(true, Some("apiprobe=trace".into()), Some("info".into()));
        assert_eq!(directives, "apiprobe=trace");
        assert_eq!(filter_directives(false, None, Some("info".into())), "info");
    }

    #[test]
    fn blank_variable_is_ignored() {
        assert_eq!(filter_directives(false, Some("  ".into()), None), "warn");
    }
}
