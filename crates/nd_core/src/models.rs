use async_trait::async_trait;
use crate::types::{Article, Sentiment};
use crate::Result;

/// Supplies the raw article list for a monitoring cycle.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Fetch the latest raw articles, without analysis or grouping fields
    async fn fetch(&self) -> Result<Vec<Article>>;
}

pub trait SentimentAnalyzer: Send + Sync {
    /// Polarity in [-1, 1] and subjectivity in [0, 1] of a piece of text
    fn analyze(&self, text: &str) -> Sentiment;
}

pub trait BiasDetector: Send + Sync {
    /// Keyword bias score of an article in [0, 10]
    fn detect(&self, article: &Article) -> f64;
}
