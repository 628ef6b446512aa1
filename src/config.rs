//! Matcher configuration.

use crate::error::ConfigError;
use crate::mapping::SubstitutionMap;
use crate::variants::DEFAULT_MAX_SUBS;

/// Extensions accepted as photos when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Upper bound on substituted positions per variant.
    pub max_subs: usize,
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    pub mapping: SubstitutionMap,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_subs: DEFAULT_MAX_SUBS,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            mapping: SubstitutionMap::kazakh(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_subs == 0 {
            return Err(ConfigError::InvalidMaxSubs(self.max_subs));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::EmptyExtensions);
        }
        Ok(())
    }

    /// True when `file_name` ends with one of the accepted extensions,
    /// ignoring case.
    pub fn is_image(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions
            .iter()
            .any(|ext| lower.len() > ext.len() && lower.ends_with(&format!(".{ext}")))
    }
}

/// Parses a comma-separated extension list such as `"jpg, .JPEG,png"`.
///
/// Returns `None` for an empty list so callers can keep their default.
pub fn parse_exts(exts: &str) -> Option<Vec<String>> {
    let trimmed = exts.trim();
    if trimmed.is_empty() {
        return None;
    }
    let list: Vec<String> = trimmed
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
