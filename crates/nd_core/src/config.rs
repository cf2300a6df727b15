use crate::types::{GroupingMode, ScoringMode, SCORE_MAX};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_MANIPULATION_THRESHOLD: f64 = 6.5;
pub const DEFAULT_RETENTION_CAP: usize = 1000;
pub const DEFAULT_CLUSTER_EPS: f64 = 0.6;
pub const DEFAULT_CLUSTER_MIN_SAMPLES: usize = 1;

const CLICKBAIT_PHRASES: &[&str] = &[
    "shocking", "unbelievable", "you won't believe", "you won’t believe", "exposed",
    "secret", "top", "the truth about", "never seen before", "revealed", "surprising",
    "this is what happens", "will blow your mind", "can't believe", "can’t believe",
    "must see", "what happened next", "goes viral", "insane", "the reason why",
    "miracle", "will change your life", "hidden", "uncovered", "no one tells you",
    "jaw-dropping", "one simple trick", "instantly", "this is why", "epic", "game changer",
];

/// A named keyword list counted by the bias detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub keywords: Vec<String>,
}

impl KeywordCategory {
    fn new(name: &str, weight: f64, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            weight,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Tunables for every component, passed in at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manipulation_threshold: f64,
    pub retention_cap: usize,
    pub cluster_eps: f64,
    pub cluster_min_samples: usize,
    pub novelty_weight: f64,
    pub scoring_mode: ScoringMode,
    pub grouping_mode: GroupingMode,
    pub data_file: PathBuf,
    pub backup_dir: PathBuf,
    pub update_interval_secs: u64,
    pub backup_interval_secs: u64,
    pub web_host: String,
    pub web_port: u16,
    pub clickbait_phrases: Vec<String>,
    pub bias_keywords: Vec<KeywordCategory>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manipulation_threshold: DEFAULT_MANIPULATION_THRESHOLD,
            retention_cap: DEFAULT_RETENTION_CAP,
            cluster_eps: DEFAULT_CLUSTER_EPS,
            cluster_min_samples: DEFAULT_CLUSTER_MIN_SAMPLES,
            novelty_weight: 0.5,
            scoring_mode: ScoringMode::default(),
            grouping_mode: GroupingMode::default(),
            data_file: PathBuf::from("data/articles.json"),
            backup_dir: PathBuf::from("data"),
            update_interval_secs: 300,
            backup_interval_secs: 3600,
            web_host: "127.0.0.1".to_string(),
            web_port: 5000,
            clickbait_phrases: CLICKBAIT_PHRASES.iter().map(|p| p.to_string()).collect(),
            bias_keywords: vec![
                KeywordCategory::new(
                    "left",
                    1.0,
                    &["progressive", "liberal", "democrat", "socialism", "climate change"],
                ),
                KeywordCategory::new(
                    "right",
                    1.0,
                    &["conservative", "republican", "traditional", "free market", "patriot"],
                ),
                KeywordCategory::new(
                    "inflammatory",
                    1.5,
                    &["shocking", "outrageous", "scandal", "exposed", "devastating"],
                ),
                KeywordCategory::new(
                    "clickbait",
                    1.5,
                    &[
                        "you won't believe", "shocking truth", "experts hate", "one weird trick",
                        "shocking", "unbelievable", "you won’t believe", "exposed", "secret",
                        "top", "the truth about", "never seen before", "revealed", "surprising",
                        "this is what happens", "will blow your mind", "can’t believe", "must see",
                        "what happened next", "goes viral", "insane", "the reason why", "miracle",
                        "will change your life", "hidden", "uncovered", "no one tells you",
                        "jaw-dropping", "one simple trick", "instantly", "this is why", "epic",
                        "game changer",
                    ],
                ),
            ],
        }
    }
}

impl Config {
    /// Loads a JSON config file; missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Overrides values from `ND_*` environment variables.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = var("ND_MANIPULATION_THRESHOLD") {
            self.manipulation_threshold = parse_var("ND_MANIPULATION_THRESHOLD", &v)?;
        }
        if let Some(v) = var("ND_RETENTION_CAP") {
            self.retention_cap = parse_var("ND_RETENTION_CAP", &v)?;
        }
        if let Some(v) = var("ND_DATA_FILE") {
            self.data_file = PathBuf::from(v);
        }
        if let Some(v) = var("ND_UPDATE_INTERVAL") {
            self.update_interval_secs = parse_var("ND_UPDATE_INTERVAL", &v)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=SCORE_MAX).contains(&self.manipulation_threshold) {
            return Err(Error::Config(format!(
                "manipulation_threshold must be in [0, {}], got {}",
                SCORE_MAX, self.manipulation_threshold
            )));
        }
        if self.retention_cap == 0 {
            return Err(Error::Config("retention_cap must be positive".to_string()));
        }
        if !(self.cluster_eps > 0.0 && self.cluster_eps <= 2.0) {
            return Err(Error::Config(format!(
                "cluster_eps must be in (0, 2], got {}",
                self.cluster_eps
            )));
        }
        if self.cluster_min_samples == 0 {
            return Err(Error::Config("cluster_min_samples must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.novelty_weight) {
            return Err(Error::Config(format!(
                "novelty_weight must be in [0, 1], got {}",
                self.novelty_weight
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.manipulation_threshold, 6.5);
        assert_eq!(config.retention_cap, 1000);
        assert!(config.clickbait_phrases.iter().any(|p| p == "game changer"));
        let clickbait = config
            .bias_keywords
            .iter()
            .find(|c| c.name == "clickbait")
            .unwrap();
        assert_eq!(clickbait.keywords.len(), 33);
        assert!(clickbait.keywords.iter().any(|k| k == "can’t believe"));
    }

    #[test]
    fn test_from_file_fills_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"manipulation_threshold": 3.0, "grouping_mode": "title"}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.manipulation_threshold, 3.0);
        assert_eq!(config.grouping_mode, GroupingMode::Title);
        assert_eq!(config.retention_cap, DEFAULT_RETENTION_CAP);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            [("ND_RETENTION_CAP", "50"), ("ND_DATA_FILE", "/tmp/a.json")].into_iter().collect();
        let config = Config::default()
            .apply_vars(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.retention_cap, 50);
        assert_eq!(config.data_file, PathBuf::from("/tmp/a.json"));

        let bad = Config::default().apply_vars(|k| {
            (k == "ND_MANIPULATION_THRESHOLD").then(|| "high".to_string())
        });
        assert!(matches!(bad, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config { cluster_eps: 0.0, ..Config::default() };
        assert!(config.validate().is_err());
        let config = Config { cluster_min_samples: 0, ..Config::default() };
        assert!(config.validate().is_err());
        let config = Config { novelty_weight: 1.5, ..Config::default() };
        assert!(config.validate().is_err());
        let config = Config { retention_cap: 0, ..Config::default() };
        assert!(config.validate().is_err());
        let config = Config { manipulation_threshold: f64::NAN, ..Config::default() };
        assert!(config.validate().is_err());
    }
}
