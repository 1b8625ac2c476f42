//! Version token extraction from page text
//!
//! The page advertises its release as `Latest Version: 1.2.3 (Android Only)`.
//! Whatever the single capture group matches is taken as the version token,
//! trimmed but otherwise unvalidated.

use regex::Regex;
use tracing::{info, warn};

use crate::monitor::error::ExtractError;

/// Default pattern: `Latest Version: <token> (Android Only)`
pub const DEFAULT_VERSION_PATTERN: &str = r"Latest Version: (.*?) \(Android Only\)";

/// Pulls a version token out of page text with a one-group regex
#[derive(Debug, Clone)]
pub struct VersionExtractor {
    pattern: Regex,
}

impl VersionExtractor {
    /// Compiles `pattern`, which must contain exactly one capture group
    pub fn new(pattern: &str) -> Result<Self, ExtractError> {
        let pattern =
            Regex::new(pattern).map_err(|e| ExtractError::InvalidPattern(e.to_string()))?;

        // captures_len counts the implicit whole-match group
        let groups = pattern.captures_len() - 1;
        if groups != 1 {
            return Err(ExtractError::InvalidPattern(format!(
                "expected exactly one capture group, found {}",
                groups
            )));
        }

        Ok(Self { pattern })
    }

    /// Returns the trimmed first capture of the first match
    pub fn extract(&self, text: &str) -> Result<String, ExtractError> {
        let version = self
            .pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty());

        match version {
            Some(version) => {
                info!("Extracted version: {}", version);
                Ok(version.to_string())
            }
            None => {
                warn!("Version pattern {:?} not found in page", self.pattern.as_str());
                Err(ExtractError::NotFound)
            }
        }
    }
}

impl Default for VersionExtractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_VERSION_PATTERN).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Latest Version: 1.2.3 (Android Only)", "1.2.3")]
    #[case("<h2>Latest Version: 1.160.0 (Android Only)</h2>", "1.160.0")]
    #[case("Latest Version:   2.0.0-beta   (Android Only)", "2.0.0-beta")]
    #[case("Latest Version: not-a-number (Android Only)", "not-a-number")]
    #[case(
        "Latest Version: 1.0.0 (Android Only) ... Latest Version: 0.9.0 (Android Only)",
        "1.0.0"
    )]
    fn extract_returns_trimmed_capture(#[case] text: &str, #[case] expected: &str) {
        let extractor = VersionExtractor::default();

        assert_eq!(extractor.extract(text).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("<html><body>Download now</body></html>")]
    #[case("Latest Version: 1.2.3 (iOS Only)")]
    #[case("Latest Version: 1.2.3")]
    #[case("Latest Version:   (Android Only)")]
    fn extract_returns_not_found_without_match(#[case] text: &str) {
        let extractor = VersionExtractor::default();

        assert!(matches!(
            extractor.extract(text),
            Err(ExtractError::NotFound)
        ));
    }

    #[test]
    fn new_accepts_custom_single_group_pattern() {
        let extractor = VersionExtractor::new(r"Release (\S+) is out").unwrap();

        assert_eq!(
            extractor.extract("News: Release v4.2 is out!").unwrap(),
            "v4.2"
        );
    }

    #[rstest]
    #[case(r"Latest Version: \S+")]
    #[case(r"(\d+)\.(\d+)")]
    #[case(r"Latest Version: (")]
    fn new_rejects_patterns_without_exactly_one_group(#[case] pattern: &str) {
        assert!(matches!(
            VersionExtractor::new(pattern),
            Err(ExtractError::InvalidPattern(_))
        ));
    }
}
