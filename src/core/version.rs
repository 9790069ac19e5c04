//! Tool version comparison and the backward-compatibility flags derived from it.
//!
//! Generated code occasionally has to change shape when the runtime library it
//! targets changes. Rather than comparing versions at every call site, the
//! pipeline builds one [`VersionGate`] per run and every context builder asks
//! it for the flags it needs.

use tracing::warn;

use crate::core::error::{Error, Result};

/// Version of this build; also names the overlay directory of the template home.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Releases after this one import the HTTP helper package from the handler
/// template instead of the handler's import list.
pub const HTTPX_IN_TEMPLATE_SINCE: &str = "1.1.10";

/// Returns true when `current` is strictly greater than `threshold`.
///
/// Both strings are split on `.`, padded with zero segments to the same length
/// and compared numerically. Malformed input fails closed: the result is
/// `false` and a warning is logged.
pub fn is_version_greater_than(current: &str, threshold: &str) -> bool {
    match (parse_segments(current), parse_segments(threshold)) {
        (Ok(mut current_segments), Ok(mut threshold_segments)) => {
            let len = current_segments.len().max(threshold_segments.len());
            current_segments.resize(len, 0);
            threshold_segments.resize(len, 0);
            current_segments > threshold_segments
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!(current, threshold, error = %e, "Version comparison failed closed");
            false
        }
    }
}

fn parse_segments(version: &str) -> Result<Vec<u64>> {
    let version = version.trim();
    if version.is_empty() {
        return Err(Error::VersionParse(version.to_string()));
    }

    version
        .split('.')
        .map(|segment| {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::VersionParse(version.to_string()));
            }
            segment
                .parse::<u64>()
                .map_err(|_| Error::VersionParse(version.to_string()))
        })
        .collect()
}

/// Version-dependent switches for generated code, fixed for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
    current: String,
}

impl VersionGate {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }

    /// The version the gate compares against thresholds
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_greater_than(&self, threshold: &str) -> bool {
        is_version_greater_than(&self.current, threshold)
    }

    /// Whether handlers import the HTTP helper from the template body
    pub fn after_1_1_10(&self) -> bool {
        self.is_greater_than(HTTPX_IN_TEMPLATE_SINCE)
    }
}

impl Default for VersionGate {
    fn default() -> Self {
        Self::new(TOOL_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greater_patch_version() {
        assert!(is_version_greater_than("1.1.11", "1.1.10"));
        assert!(!is_version_greater_than("1.1.10", "1.1.10"));
        assert!(!is_version_greater_than("1.1.9", "1.1.10"));
    }

    #[test]
    fn test_segments_compare_numerically() {
        assert!(is_version_greater_than("1.10.0", "1.9.9"));
        assert!(is_version_greater_than("2", "1.99.99"));
    }

    #[test]
    fn test_zero_padding() {
        assert!(!is_version_greater_than("1.1", "1.1.0"));
        assert!(!is_version_greater_than("1.1.0.0", "1.1"));
        assert!(is_version_greater_than("1.1.0.1", "1.1"));
    }

    #[test]
    fn test_malformed_versions_fail_closed() {
        assert!(!is_version_greater_than("bad", "1.1.10"));
        assert!(!is_version_greater_than("1.1.11", "bad"));
        assert!(!is_version_greater_than("", "1.0"));
        assert!(!is_version_greater_than("1..2", "1.0"));
        assert!(!is_version_greater_than("1.2.3-beta", "1.0"));
    }

    #[test]
    fn test_parse_segments_reports_version_parse_error() {
        assert!(matches!(parse_segments("x.1"), Err(Error::VersionParse(v)) if v == "x.1"));
        assert_eq!(parse_segments("1.20.3").unwrap(), vec![1, 20, 3]);
    }

    #[test]
    fn test_gate_flags() {
        assert!(VersionGate::new("1.2.0").after_1_1_10());
        assert!(!VersionGate::new("1.1.10").after_1_1_10());
        assert!(!VersionGate::new("garbage").after_1_1_10());
        assert_eq!(VersionGate::default().current(), TOOL_VERSION);
    }
}
