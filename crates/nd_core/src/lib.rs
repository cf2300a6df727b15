pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use config::{Config, KeywordCategory};
pub use error::{Error, Result};
pub use models::{ArticleSource, BiasDetector, SentimentAnalyzer};
pub use storage::ArticleStore;
pub use types::{
    clamp_score, Analysis, Article, EffectiveTime, GroupingMode, MergeSummary, ScoringMode,
    Sentiment, SCORE_MAX,
};

pub mod prelude {
    pub use super::{Article, Config, Error, GroupingMode, Result, ScoringMode};
}
