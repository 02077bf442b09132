//! Box collider configuration

use serde::{Deserialize, Serialize};

use super::Config;
use crate::scene::Selector;

/// Default evaluation interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Settings for one box collider
///
/// Missing fields fall back to their defaults when loading from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderConfig {
    /// Run evaluations at all
    pub enabled: bool,
    /// Minimum time between evaluations; zero evaluates every tick
    pub evaluation_interval_ms: u64,
    /// Test candidates that are not visible
    pub include_non_visible: bool,
    /// Which entities are candidates
    pub selector: Selector,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            evaluation_interval_ms: DEFAULT_INTERVAL_MS,
            include_non_visible: false,
            selector: Selector::default(),
        }
    }
}

impl ColliderConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enable flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the evaluation interval
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.evaluation_interval_ms = interval_ms;
        self
    }

    /// Include or exclude non-visible candidates
    pub fn with_include_non_visible(mut self, include: bool) -> Self {
        self.include_non_visible = include;
        self
    }

    /// Set the candidate selector
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }
}

impl Config for ColliderConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigFormat};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ColliderConfig::default();
        assert!(config.enabled);
        assert_eq!(config.evaluation_interval_ms, 100);
        assert!(!config.include_non_visible);
        assert_eq!(config.selector.to_string(), "[box-collision-listener]");
    }

    #[test]
    fn test_builder() {
        let config = ColliderConfig::new()
            .with_enabled(false)
            .with_interval_ms(0)
            .with_include_non_visible(true)
            .with_selector(Selector::id("target"));
        assert!(!config.enabled);
        assert_eq!(config.evaluation_interval_ms, 0);
        assert!(config.include_non_visible);
        assert_eq!(config.selector, Selector::id("target"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ColliderConfig::from_str_as("evaluation_interval_ms = 250\n", ConfigFormat::Toml)
            .expect("valid toml");
        assert_eq!(config.evaluation_interval_ms, 250);
        assert!(config.enabled);
        assert_eq!(config.selector, Selector::default());
    }

    #[test]
    fn test_selector_string_is_parsed() {
        let config = ColliderConfig::from_str_as(r##"selector = "#door, [pickup]""##, ConfigFormat::Toml)
            .expect("valid toml");
        assert_eq!(config.selector.terms().len(), 2);

        let everything = ColliderConfig::from_str_as(r#"selector = """#, ConfigFormat::Toml)
            .expect("valid toml");
        assert!(everything.selector.is_all());
    }

    #[test]
    fn test_bad_selector_is_a_parse_error() {
        let result = ColliderConfig::from_str_as(r#"selector = "[]""#, ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_file_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("collider.toml");
        let config = ColliderConfig::new()
            .with_interval_ms(40)
            .with_selector(Selector::attribute("hazard"));

        config.save_to_file(&path).expect("save");
        let loaded = ColliderConfig::load_from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("collider.ron");
        let config = ColliderConfig::new().with_include_non_visible(true);

        config.save_to_file(&path).expect("save");
        let loaded = ColliderConfig::load_from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_ron_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".ron")
            .tempfile()
            .expect("temp file");
        writeln!(file, "(enabled: false)").expect("write");

        let loaded = ColliderConfig::load_from_file(file.path()).expect("load");
        assert!(!loaded.enabled);
        assert_eq!(loaded.evaluation_interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_missing_file_and_unknown_extension() {
        assert!(matches!(
            ColliderConfig::load_from_file("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(
            ColliderConfig::default().save_to_file("collider.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
