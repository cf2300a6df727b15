use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound shared by bias and manipulation scores.
pub const SCORE_MAX: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fetched_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_cluster: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    /// Fields supplied by collaborators that this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Article {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: String::new(),
            source: String::new(),
            published_at: None,
            fetched_at: Utc::now().to_rfc3339(),
            evolution_index: None,
            topic_cluster: None,
            analysis: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_fetched_at(mut self, fetched_at: impl Into<String>) -> Self {
        self.fetched_at = fetched_at.into();
        self
    }

    /// `published_at` when present and non-blank, otherwise `fetched_at`.
    pub fn effective_time_raw(&self) -> &str {
        match self.published_at.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => &self.fetched_at,
        }
    }

    pub fn effective_time(&self) -> EffectiveTime {
        EffectiveTime::parse(self.effective_time_raw())
    }

    /// Text fed to the sentiment and bias collaborators.
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// True when `other` is a content change of the same story instance.
    pub fn content_differs(&self, other: &Article) -> bool {
        self.title != other.title
            || self.description != other.description
            || self.published_at != other.published_at
    }

    /// Host part of the URL, used as a best-effort outlet name.
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

impl Sentiment {
    pub fn new(polarity: f64, subjectivity: f64) -> Self {
        Self {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub sentiment: Sentiment,
    pub bias_score: f64,
    pub manipulation_score: f64,
    #[serde(default)]
    pub is_high_manipulation: bool,
    #[serde(default)]
    pub analyzed_at: String,
}

impl Analysis {
    pub fn new(sentiment: Sentiment, bias_score: f64, manipulation_score: f64, threshold: f64) -> Self {
        let mut analysis = Self {
            sentiment,
            bias_score: clamp_score(bias_score),
            manipulation_score: 0.0,
            is_high_manipulation: false,
            analyzed_at: Utc::now().to_rfc3339(),
        };
        analysis.set_manipulation_score(manipulation_score, threshold);
        analysis
    }

    /// Replaces the score and recomputes the flag against it.
    pub fn set_manipulation_score(&mut self, score: f64, threshold: f64) {
        self.manipulation_score = clamp_score(score);
        self.is_high_manipulation = self.manipulation_score > threshold;
    }
}

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, SCORE_MAX)
}

/// Sort key for an article's effective time.
///
/// Parsed timestamps order chronologically and always precede values that
/// could not be parsed, which fall back to lexical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum EffectiveTime {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl EffectiveTime {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::Parsed(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
            return Self::Parsed(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Self::Parsed(naive.and_utc());
            }
        }
        Self::Raw(trimmed.to_string())
    }
}

/// Which grouping pass assigns evolution structure to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    #[default]
    Fingerprint,
    Title,
}

impl GroupingMode {
    /// Lenient mapping used by external triggers: only `title` selects clustering.
    pub fn from_query(mode: Option<&str>) -> Self {
        match mode.map(|m| m.trim().to_lowercase()) {
            Some(m) if m == "title" => Self::Title,
            _ => Self::Fingerprint,
        }
    }
}

impl FromStr for GroupingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fingerprint" | "url" => Ok(Self::Fingerprint),
            "title" | "similarity" => Ok(Self::Title),
            other => Err(format!("Invalid grouping mode: {}", other)),
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fingerprint => write!(f, "fingerprint"),
            Self::Title => write!(f, "title"),
        }
    }
}

/// How a cycle settles the final manipulation score of each article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Additive,
    #[default]
    Novelty,
    Blend,
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "additive" => Ok(Self::Additive),
            "novelty" => Ok(Self::Novelty),
            "blend" => Ok(Self::Blend),
            other => Err(format!("Invalid scoring mode: {}", other)),
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Additive => write!(f, "additive"),
            Self::Novelty => write!(f, "novelty"),
            Self::Blend => write!(f, "blend"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergeSummary {
    pub added: usize,
    pub total: usize,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
