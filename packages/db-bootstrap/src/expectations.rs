//! Per-dialect expectations for values that legitimately differ between
//! backends, such as generated SQL or driver error messages.

use regex::Regex;

use crate::error::BootstrapError;

/// Check `value` against the pattern registered for `dialect`.
///
/// Every dialect a suite runs against needs an entry; a missing one is an
/// error rather than a silent pass.
pub fn check_match_for_dialects(
    dialect: &str,
    value: &str,
    expectations: &[(&str, Regex)],
) -> Result<(), BootstrapError> {
    let (_, pattern) = expectations
        .iter()
        .find(|(name, _)| *name == dialect)
        .ok_or_else(|| BootstrapError::MissingExpectation {
            dialect: dialect.to_string(),
        })?;

    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(BootstrapError::ExpectationMismatch {
            dialect: dialect.to_string(),
            value: value.to_string(),
            pattern: pattern.as_str().to_string(),
        })
    }
}
