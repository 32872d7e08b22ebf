//! Shared tooling for the workspace's test binaries: one-time tracing setup
//! and unique names for fixtures.

pub mod logging;

use ulid::Ulid;

/// Generate a unique string in the format `{prefix}-{ulid}`.
///
/// ```
/// use test_support::unique_str;
///
/// let a = unique_str("fixture");
/// let b = unique_str("fixture");
/// assert_ne!(a, b);
/// assert!(a.starts_with("fixture-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Unique file name with the given extension, e.g. `suite-01J...sqlite`.
pub fn unique_file_name(prefix: &str, extension: &str) -> String {
    format!("{}.{}", unique_str(prefix), extension)
}
