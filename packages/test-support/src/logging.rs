//! Test logging for the workspace's test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when neither `TEST_LOG` nor `RUST_LOG` is set. The sqlx
/// statement logger is noisy at info.
pub const DEFAULT_FILTER: &str = "warn,db_bootstrap=warn,sqlx=warn";

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Resolve the filter directive: `TEST_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_FILTER`].
pub fn filter_directive() -> String {
    directive_from(|key| std::env::var(key).ok())
}

fn directive_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("TEST_LOG")
        .or_else(|| lookup("RUST_LOG"))
        .filter(|raw| !raw.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install a captured, timestamp-free subscriber once per test binary.
/// Later calls, or a subscriber installed elsewhere, are left alone.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_new(filter_directive())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_wins_over_rust_log() {
        let directive = directive_from(|key| match key {
            "TEST_LOG" => Some("db_bootstrap=debug".to_string()),
            "RUST_LOG" => Some("info".to_string()),
            _ => None,
        });
        assert_eq!(directive, "db_bootstrap=debug");
    }

    #[test]
    fn blank_or_unset_falls_back_to_default() {
        assert_eq!(directive_from(|_| None), DEFAULT_FILTER);
        assert_eq!(
            directive_from(|key| (key == "TEST_LOG").then(|| "  ".to_string())),
            DEFAULT_FILTER
        );
    }

    #[test]
    fn init_twice_is_a_no_op() {
        init();
        init();
        tracing::warn!("logging initialized");
    }
}
