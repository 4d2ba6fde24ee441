use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_core::SourceKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Knobs for the extractors and the upload policy.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Receipt lines containing any of these (case-insensitive) are never items.
    pub noise_tokens: Vec<String>,
    /// Skip zero-amount items and history lines instead of passing them through.
    pub reject_zero_amounts: bool,
    /// Source kinds a history upload may come from.
    pub history_sources: Vec<SourceKind>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            noise_tokens: vec!["total".to_string(), "subtotal".to_string(), "tax".to_string()],
            reject_zero_amounts: false,
            history_sources: vec![SourceKind::Pdf],
        }
    }
}

impl ExtractConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn is_noise(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.noise_tokens
            .iter()
            .any(|token| !token.is_empty() && lower.contains(&token.to_lowercase()))
    }

    pub fn accepts_history_source(&self, kind: SourceKind) -> bool {
        self.history_sources.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ExtractConfig::from_toml("").unwrap();
        assert_eq!(config, ExtractConfig::default());
        assert!(!config.reject_zero_amounts);
        assert_eq!(config.history_sources, vec![SourceKind::Pdf]);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = ExtractConfig::from_toml(
            r#"
            reject_zero_amounts = true
            history_sources = ["pdf", "plain_text"]
            "#,
        )
        .unwrap();
        assert!(config.reject_zero_amounts);
        assert!(config.accepts_history_source(SourceKind::PlainText));
        assert!(!config.accepts_history_source(SourceKind::Image));
        assert_eq!(config.noise_tokens.len(), 3);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(matches!(
            ExtractConfig::from_toml("reject_zero_amounts = \"maybe\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn noise_matches_substrings_in_any_case() {
        let config = ExtractConfig::default();
        assert!(config.is_noise("TOTAL 6.49"));
        assert!(config.is_noise("Subtotal 10.00"));
        assert!(config.is_noise("Sales Tax 0.50"));
        assert!(config.is_noise("Taxi 12.00"));
        assert!(!config.is_noise("Milk 3.99"));
    }

    #[test]
    fn custom_noise_tokens_replace_defaults() {
        let config = ExtractConfig::from_toml(r#"noise_tokens = ["change", "cash"]"#).unwrap();
        assert!(config.is_noise("CHANGE DUE 1.00"));
        assert!(!config.is_noise("TOTAL 6.49"));
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reject_zero_amounts = true").unwrap();
        let config = ExtractConfig::from_file(file.path()).unwrap();
        assert!(config.reject_zero_amounts);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = ExtractConfig::from_file(Path::new("/nonexistent/tally.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
