//! Configuration loading for wordhoard.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.wordhoard/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Quality;
use crate::error::{Result, VocabError};

/// Main configuration struct for wordhoard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Knowledge document configuration.
    pub knowledge: KnowledgeConfig,
    /// Score update configuration.
    pub scoring: ScoringConfig,
    /// Word selection configuration.
    pub selection: SelectionConfig,
    /// In-session ordering configuration.
    pub spacing: SpacingConfig,
}

/// Knowledge document configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Number of session records kept in the document history.
    pub history_limit: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}

/// Score deltas applied per answer quality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub perfect: i32,
    pub good: i32,
    pub hard: i32,
    pub failed: i32,
}

impl ScoringConfig {
    /// Score delta for a quality level.
    pub fn delta(&self, quality: Quality) -> i32 {
        match quality {
            Quality::Perfect => self.perfect,
            Quality::Good => self.good,
            Quality::Hard => self.hard,
            Quality::Failed => self.failed,
        }
    }

    /// Better answers must never move the score less than worse answers.
    pub fn is_monotonic(&self) -> bool {
        self.perfect >= self.good && self.good >= self.hard && self.hard >= self.failed
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            perfect: 12,
            good: 8,
            hard: 3,
            failed: -10,
        }
    }
}

/// Word selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Upper bound of the reinforcement quota per recency bucket.
    pub recent_quota_max: usize,
    /// Session size divided by this gives the proportional quota.
    pub recent_quota_divisor: usize,
    /// Number of past sessions considered "recent".
    pub recency_window: usize,
    /// Number of past sessions kept per category.
    pub history_depth: usize,
    /// Score at or above which a practiced word is well known.
    pub mastery_threshold: u8,
    /// Score below which a practiced word is weak.
    pub weak_threshold: u8,
    /// Fraction of well-known selections replaced by weak or new words.
    pub knowledge_substitution_ratio: f64,
    /// Whether frequent words are favored.
    pub prioritize_frequency: bool,
    /// Rank limit of the top-frequency set.
    pub top_frequency_limit: u32,
    /// Desired fraction of top-frequency words in a session.
    pub frequency_target_ratio: f64,
    /// Fraction of non-frequent selections replaced when below target.
    pub frequency_substitution_ratio: f64,
}

impl SelectionConfig {
    /// Check if a ratio is a finite value in `[0.0, 1.0]`.
    pub fn is_valid_ratio(value: f64) -> bool {
        value.is_finite() && (0.0..=1.0).contains(&value)
    }

    /// Check if a score threshold is within `[0, 100]`.
    pub fn is_valid_threshold(value: u8) -> bool {
        value <= 100
    }

    /// Reinforcement quota for a session of `count` words.
    pub fn recent_quota(&self, count: usize) -> usize {
        let divisor = self.recent_quota_divisor.max(1);
        self.recent_quota_max.min(count / divisor)
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            recent_quota_max: 2,
            recent_quota_divisor: 10,
            recency_window: 5,
            history_depth: 10,
            mastery_threshold: 80,
            weak_threshold: 40,
            knowledge_substitution_ratio: 0.25,
            prioritize_frequency: true,
            top_frequency_limit: 1000,
            frequency_target_ratio: 0.7,
            frequency_substitution_ratio: 0.35,
        }
    }
}

/// In-session ordering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpacingConfig {
    /// Minimum distance between repeats of the same word.
    pub min_distance: usize,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self { min_distance: 3 }
    }
}

impl Config {
    /// Load configuration with the full precedence chain.
    pub fn load() -> Self {
        match wordhoard_home() {
            Some(home) => Self::load_from_home(&home),
            None => {
                let mut config = Config::default();
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration from a specific home directory.
    pub fn load_from_home(home: &Path) -> Self {
        let mut config = Config::default();

        let path = home.join("config.toml");
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(user_config) => config = config.merge(user_config),
                Err(e) => tracing::warn!("ignoring {}: {}", path.display(), e),
            }
        }

        config.apply_env_overrides();
        config
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| VocabError::storage(path, e))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| VocabError::config(e.to_string()))?;

        if !config.scoring.is_monotonic() {
            return Err(VocabError::config(
                "scoring deltas must satisfy perfect >= good >= hard >= failed",
            ));
        }
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // WORDHOARD_HISTORY_LIMIT
        if let Ok(val) = env::var("WORDHOARD_HISTORY_LIMIT") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => self.knowledge.history_limit = n,
                _ => eprintln!(
                    "Warning: Invalid WORDHOARD_HISTORY_LIMIT value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val, self.knowledge.history_limit
                ),
            }
        }

        // WORDHOARD_TOP_FREQUENCY_LIMIT
        if let Ok(val) = env::var("WORDHOARD_TOP_FREQUENCY_LIMIT") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => self.selection.top_frequency_limit = n,
                _ => eprintln!(
                    "Warning: Invalid WORDHOARD_TOP_FREQUENCY_LIMIT value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val, self.selection.top_frequency_limit
                ),
            }
        }

        // WORDHOARD_PRIORITIZE_FREQUENCY
        if let Ok(val) = env::var("WORDHOARD_PRIORITIZE_FREQUENCY") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.selection.prioritize_frequency = true,
                "false" | "0" | "no" => self.selection.prioritize_frequency = false,
                _ => eprintln!(
                    "Warning: Invalid WORDHOARD_PRIORITIZE_FREQUENCY value '{}'. \
                    Expected true or false. Using '{}'.",
                    val, self.selection.prioritize_frequency
                ),
            }
        }

        // WORDHOARD_MIN_DISTANCE
        if let Ok(val) = env::var("WORDHOARD_MIN_DISTANCE") {
            match val.parse::<usize>() {
                Ok(n) => self.spacing.min_distance = n,
                Err(_) => eprintln!(
                    "Warning: Invalid WORDHOARD_MIN_DISTANCE value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val, self.spacing.min_distance
                ),
            }
        }

        // WORDHOARD_MASTERY_THRESHOLD
        if let Ok(val) = env::var("WORDHOARD_MASTERY_THRESHOLD") {
            match val.parse::<u8>() {
                Ok(n) if SelectionConfig::is_valid_threshold(n) => {
                    self.selection.mastery_threshold = n
                }
                _ => eprintln!(
                    "Warning: Invalid WORDHOARD_MASTERY_THRESHOLD value '{}'. \
                    Must be between 0 and 100. Using '{}'.",
                    val, self.selection.mastery_threshold
                ),
            }
        }

        // WORDHOARD_WEAK_THRESHOLD
        if let Ok(val) = env::var("WORDHOARD_WEAK_THRESHOLD") {
            match val.parse::<u8>() {
                Ok(n) if SelectionConfig::is_valid_threshold(n) => {
                    self.selection.weak_threshold = n
                }
                _ => eprintln!(
                    "Warning: Invalid WORDHOARD_WEAK_THRESHOLD value '{}'. \
                    Must be between 0 and 100. Using '{}'.",
                    val, self.selection.weak_threshold
                ),
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Each field of `other` that differs from the default wins. A value
    /// explicitly set to its default cannot override a lower layer.
    /// Out-of-range values are dropped with a warning.
    fn merge(mut self, other: Config) -> Self {
        let default_knowledge = KnowledgeConfig::default();
        if other.knowledge.history_limit != default_knowledge.history_limit {
            if other.knowledge.history_limit > 0 {
                self.knowledge.history_limit = other.knowledge.history_limit;
            } else {
                tracing::warn!("ignoring knowledge.history_limit = 0, must be positive");
            }
        }

        if other.scoring != ScoringConfig::default() {
            self.scoring = other.scoring;
        }

        let d = SelectionConfig::default();
        let o = other.selection;
        if o.recent_quota_max != d.recent_quota_max {
            self.selection.recent_quota_max = o.recent_quota_max;
        }
        if o.recent_quota_divisor != d.recent_quota_divisor {
            self.selection.recent_quota_divisor = o.recent_quota_divisor;
        }
        if o.recency_window != d.recency_window {
            if o.recency_window >= 1 {
                self.selection.recency_window = o.recency_window;
            } else {
                tracing::warn!("ignoring selection.recency_window = 0, must be at least 1");
            }
        }
        if o.history_depth != d.history_depth {
            if o.history_depth > 0 {
                self.selection.history_depth = o.history_depth;
            } else {
                tracing::warn!("ignoring selection.history_depth = 0, must be positive");
            }
        }

        let (mastery, weak) = (self.selection.mastery_threshold, self.selection.weak_threshold);
        if o.mastery_threshold != d.mastery_threshold {
            if SelectionConfig::is_valid_threshold(o.mastery_threshold) {
                self.selection.mastery_threshold = o.mastery_threshold;
            } else {
                tracing::warn!(
                    "ignoring selection.mastery_threshold = {}, must be between 0 and 100",
                    o.mastery_threshold
                );
            }
        }
        if o.weak_threshold != d.weak_threshold {
            if SelectionConfig::is_valid_threshold(o.weak_threshold) {
                self.selection.weak_threshold = o.weak_threshold;
            } else {
                tracing::warn!(
                    "ignoring selection.weak_threshold = {}, must be between 0 and 100",
                    o.weak_threshold
                );
            }
        }
        if self.selection.weak_threshold > self.selection.mastery_threshold {
            tracing::warn!(
                "ignoring selection thresholds weak = {} above mastery = {}",
                self.selection.weak_threshold,
                self.selection.mastery_threshold
            );
            self.selection.mastery_threshold = mastery;
            self.selection.weak_threshold = weak;
        }
        if o.knowledge_substitution_ratio != d.knowledge_substitution_ratio
            && SelectionConfig::is_valid_ratio(o.knowledge_substitution_ratio)
        {
            self.selection.knowledge_substitution_ratio = o.knowledge_substitution_ratio;
        }
        if o.prioritize_frequency != d.prioritize_frequency {
            self.selection.prioritize_frequency = o.prioritize_frequency;
        }
        if o.top_frequency_limit != d.top_frequency_limit {
            self.selection.top_frequency_limit = o.top_frequency_limit;
        }
        if o.frequency_target_ratio != d.frequency_target_ratio
            && SelectionConfig::is_valid_ratio(o.frequency_target_ratio)
        {
            self.selection.frequency_target_ratio = o.frequency_target_ratio;
        }
        if o.frequency_substitution_ratio != d.frequency_substitution_ratio
            && SelectionConfig::is_valid_ratio(o.frequency_substitution_ratio)
        {
            self.selection.frequency_substitution_ratio = o.frequency_substitution_ratio;
        }

        if other.spacing.min_distance != SpacingConfig::default().min_distance {
            self.spacing.min_distance = other.spacing.min_distance;
        }

        self
    }

    /// Save configuration to `<home>/config.toml` atomically.
    pub fn save(&self, home: &Path) -> Result<()> {
        if !home.exists() {
            fs::create_dir_all(home).map_err(|e| VocabError::storage(home, e))?;
        }

        let config_path = home.join("config.toml");
        let content =
            toml::to_string_pretty(self).map_err(|e| VocabError::config(e.to_string()))?;

        let temp_path = home.join(".config.toml.tmp");
        fs::write(&temp_path, &content).map_err(|e| VocabError::storage(&temp_path, e))?;

        let file = fs::File::open(&temp_path).map_err(|e| VocabError::storage(&temp_path, e))?;
        file.sync_all()
            .map_err(|e| VocabError::storage(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, &config_path).map_err(|e| VocabError::storage(&config_path, e))?;

        Ok(())
    }
}

/// Get the wordhoard home directory.
///
/// Checks `WORDHOARD_HOME` first, then falls back to `~/.wordhoard`.
/// Empty values are ignored.
pub fn wordhoard_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("WORDHOARD_HOME") {
        if home.is_empty() {
            tracing::warn!("WORDHOARD_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("WORDHOARD_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".wordhoard"));
    }

    // Containerized or minimal environments without HOME
    let fallback_path = env::temp_dir().join("wordhoard");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Get the data directory.
///
/// Returns `<home>/data/`.
pub fn data_dir() -> Option<PathBuf> {
    wordhoard_home().map(|h| h.join("data"))
}

/// Get the crash log path.
///
/// Returns `<home>/crash.log`.
pub fn crash_log_path() -> Option<PathBuf> {
    wordhoard_home().map(|h| h.join("crash.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "WORDHOARD_HISTORY_LIMIT",
        "WORDHOARD_TOP_FREQUENCY_LIMIT",
        "WORDHOARD_PRIORITIZE_FREQUENCY",
        "WORDHOARD_MIN_DISTANCE",
        "WORDHOARD_MASTERY_THRESHOLD",
        "WORDHOARD_WEAK_THRESHOLD",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.knowledge.history_limit, 100);

        assert_eq!(config.scoring.delta(Quality::Perfect), 12);
        assert_eq!(config.scoring.delta(Quality::Failed), -10);
        assert!(config.scoring.is_monotonic());

        assert_eq!(config.selection.recent_quota_max, 2);
        assert_eq!(config.selection.recency_window, 5);
        assert_eq!(config.selection.history_depth, 10);
        assert_eq!(config.selection.mastery_threshold, 80);
        assert_eq!(config.selection.weak_threshold, 40);
        assert!((config.selection.knowledge_substitution_ratio - 0.25).abs() < f64::EPSILON);
        assert!(config.selection.prioritize_frequency);
        assert_eq!(config.selection.top_frequency_limit, 1000);
        assert!((config.selection.frequency_target_ratio - 0.7).abs() < f64::EPSILON);
        assert!((config.selection.frequency_substitution_ratio - 0.35).abs() < f64::EPSILON);

        assert_eq!(config.spacing.min_distance, 3);
    }

    #[test]
    fn test_recent_quota_is_size_proportional() {
        let selection = SelectionConfig::default();
        assert_eq!(selection.recent_quota(5), 0);
        assert_eq!(selection.recent_quota(10), 1);
        assert_eq!(selection.recent_quota(19), 1);
        assert_eq!(selection.recent_quota(20), 2);
        assert_eq!(selection.recent_quota(100), 2);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
[selection]
top_frequency_limit = 500
prioritize_frequency = false

[spacing]
min_distance = 4
"#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.selection.top_frequency_limit, 500);
        assert!(!config.selection.prioritize_frequency);
        assert_eq!(config.spacing.min_distance, 4);

        // Other fields should be defaults
        assert_eq!(config.knowledge.history_limit, 100);
        assert_eq!(config.selection.mastery_threshold, 80);
    }

    #[test]
    fn test_load_from_file_missing() {
        assert!(Config::load_from_file(Path::new("/nonexistent/config.toml")).is_err());
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_load_rejects_non_monotonic_scoring() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[scoring]
perfect = 5
good = 10
"#,
        )
        .unwrap();

        let err = Config::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, VocabError::Config { .. }));
    }

    #[test]
    #[serial]
    fn test_home_config_precedence() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[knowledge]\nhistory_limit = 40\n",
        )
        .unwrap();

        let config = Config::load_from_home(dir.path());
        assert_eq!(config.knowledge.history_limit, 40);
        assert_eq!(config.spacing.min_distance, 3);
    }

    #[test]
    #[serial]
    fn test_invalid_home_config_falls_back_to_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "[[[").unwrap();

        let config = Config::load_from_home(dir.path());
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_env_var_precedence() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[selection]\ntop_frequency_limit = 500\n",
        )
        .unwrap();

        env::set_var("WORDHOARD_TOP_FREQUENCY_LIMIT", "2000");
        let config = Config::load_from_home(dir.path());
        assert_eq!(config.selection.top_frequency_limit, 2000);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        clear_env();
        env::set_var("WORDHOARD_HISTORY_LIMIT", "25");
        env::set_var("WORDHOARD_PRIORITIZE_FREQUENCY", "no");
        env::set_var("WORDHOARD_MIN_DISTANCE", "5");
        env::set_var("WORDHOARD_MASTERY_THRESHOLD", "85");
        env::set_var("WORDHOARD_WEAK_THRESHOLD", "30");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_home(dir.path());

        assert_eq!(config.knowledge.history_limit, 25);
        assert!(!config.selection.prioritize_frequency);
        assert_eq!(config.spacing.min_distance, 5);
        assert_eq!(config.selection.mastery_threshold, 85);
        assert_eq!(config.selection.weak_threshold, 30);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_invalid_values_ignored() {
        clear_env();
        env::set_var("WORDHOARD_HISTORY_LIMIT", "0");
        env::set_var("WORDHOARD_MASTERY_THRESHOLD", "150");
        env::set_var("WORDHOARD_PRIORITIZE_FREQUENCY", "maybe");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_home(dir.path());

        assert_eq!(config.knowledge.history_limit, 100);
        assert_eq!(config.selection.mastery_threshold, 80);
        assert!(config.selection.prioritize_frequency);

        clear_env();
    }

    #[test]
    fn test_merge_field_by_field() {
        let mut base = Config::default();
        base.selection.history_depth = 8;

        let mut other = Config::default();
        other.selection.weak_threshold = 30;

        let merged = base.merge(other);
        assert_eq!(merged.selection.history_depth, 8);
        assert_eq!(merged.selection.weak_threshold, 30);
    }

    #[test]
    fn test_merge_ignores_invalid_ratio() {
        let mut other = Config::default();
        other.selection.frequency_target_ratio = 1.5;

        let merged = Config::default().merge(other);
        assert!((merged.selection.frequency_target_ratio - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_ignores_out_of_range_values() {
        let mut other = Config::default();
        other.knowledge.history_limit = 0;
        other.selection.history_depth = 0;
        other.selection.recency_window = 0;
        other.selection.mastery_threshold = 200;

        let merged = Config::default().merge(other);
        assert_eq!(merged.knowledge.history_limit, 100);
        assert_eq!(merged.selection.history_depth, 10);
        assert_eq!(merged.selection.recency_window, 5);
        assert_eq!(merged.selection.mastery_threshold, 80);
    }

    #[test]
    fn test_merge_rejects_weak_above_mastery() {
        let mut other = Config::default();
        other.selection.weak_threshold = 90;

        let merged = Config::default().merge(other);
        assert_eq!(merged.selection.weak_threshold, 40);
        assert_eq!(merged.selection.mastery_threshold, 80);

        let mut other = Config::default();
        other.selection.mastery_threshold = 95;
        other.selection.weak_threshold = 90;
        let merged = Config::default().merge(other);
        assert_eq!(merged.selection.mastery_threshold, 95);
        assert_eq!(merged.selection.weak_threshold, 90);
    }

    #[test]
    #[serial]
    fn test_load_from_home_validates_file_values() {
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[knowledge]\nhistory_limit = 0\n\n[selection]\nhistory_depth = 0\nmastery_threshold = 200\nweak_threshold = 90\n",
        )
        .unwrap();

        let config = Config::load_from_home(dir.path());
        assert_eq!(config.knowledge.history_limit, 100);
        assert_eq!(config.selection.history_depth, 10);
        assert_eq!(config.selection.mastery_threshold, 80);
        assert_eq!(config.selection.weak_threshold, 40);
    }

    #[test]
    fn test_is_valid_ratio() {
        assert!(SelectionConfig::is_valid_ratio(0.0));
        assert!(SelectionConfig::is_valid_ratio(1.0));
        assert!(!SelectionConfig::is_valid_ratio(-0.1));
        assert!(!SelectionConfig::is_valid_ratio(f64::NAN));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.selection.top_frequency_limit = 750;
        config.scoring.perfect = 15;

        config.save(dir.path()).unwrap();
        assert!(!dir.path().join(".config.toml.tmp").exists());

        let loaded = Config::load_from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    #[serial]
    fn test_wordhoard_home_with_env() {
        let dir = TempDir::new().unwrap();
        env::set_var("WORDHOARD_HOME", dir.path());

        assert_eq!(wordhoard_home(), Some(dir.path().to_path_buf()));
        assert_eq!(data_dir(), Some(dir.path().join("data")));
        assert_eq!(crash_log_path(), Some(dir.path().join("crash.log")));

        env::remove_var("WORDHOARD_HOME");
    }

    #[test]
    #[serial]
    fn test_wordhoard_home_empty_env() {
        env::set_var("WORDHOARD_HOME", "");
        let home = wordhoard_home().unwrap();
        assert!(home.ends_with(".wordhoard") || home.ends_with("wordhoard"));
        env::remove_var("WORDHOARD_HOME");
    }
}
