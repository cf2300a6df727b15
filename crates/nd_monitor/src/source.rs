use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use nd_core::{Article, ArticleSource, Error, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Cleans a raw acquisition batch: drops records without a URL, keeps the
/// first record of each URL, stamps `fetched_at` and falls back to the URL
/// host when the outlet name is missing.
pub fn normalize_batch(raw: Vec<Article>) -> Vec<Article> {
    let fetched_at = Utc::now().to_rfc3339();
    let mut seen = HashSet::new();
    let mut articles = Vec::with_capacity(raw.len());
    for mut article in raw {
        article.url = article.url.trim().to_string();
        if article.url.is_empty() {
            warn!("Dropping record without url: {:?}", article.title);
            continue;
        }
        if !seen.insert(article.url.clone()) {
            continue;
        }
        if article.fetched_at.trim().is_empty() {
            article.fetched_at = fetched_at.clone();
        }
        if article.source.trim().is_empty() {
            if let Some(host) = article.host() {
                article.source = host;
            }
        }
        articles.push(article);
    }
    articles
}

/// Reads a JSON array of raw article records from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }
}

#[async_trait]
impl ArticleSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let value: Value = serde_json::from_str(&raw)?;
        let Value::Array(items) = value else {
            return Err(Error::Source(format!(
                "{} does not hold a list of articles",
                self.path.display()
            )));
        };
        let mut records = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                return Err(Error::Source(format!("record {} is not an object", i)));
            }
            records.push(serde_json::from_value(item)?);
        }
        let articles = normalize_batch(records);
        debug!("Read {} articles from {}", articles.len(), self.path.display());
        Ok(articles)
    }
}

/// Fixed batch, returned on every fetch.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    articles: Vec<Article>,
}

impl StaticSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        Ok(normalize_batch(self.articles.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_batch() {
        let raw = vec![
            Article::new("https://www.bbc.co.uk/news/1", "A").with_fetched_at(""),
            Article::new("", "No url"),
            Article::new("https://www.bbc.co.uk/news/1", "Duplicate"),
            Article::new(" https://cnn.com/2 ", "B").with_source("CNN"),
        ];
        let articles = normalize_batch(raw);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[0].source, "bbc.co.uk");
        assert!(!articles[0].fetched_at.is_empty());
        assert_eq!(articles[1].url, "https://cnn.com/2");
        assert_eq!(articles[1].source, "CNN");
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        std::fs::write(
            &path,
            r#"[{"url": "https://a.com/1", "title": "One", "description": null, "published_at": "2024-01-01T00:00:00Z"},
                {"title": "Missing url"}]"#,
        )
        .unwrap();

        let articles = JsonFileSource::new(&path).fetch().await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].published_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(articles[0].analysis.is_none());
    }

    #[tokio::test]
    async fn test_json_file_source_rejects_non_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        std::fs::write(&path, r#"{"status": "error"}"#).unwrap();
        assert!(matches!(JsonFileSource::new(&path).fetch().await, Err(Error::Source(_))));

        std::fs::write(&path, r#"["just a string"]"#).unwrap();
        assert!(matches!(JsonFileSource::new(&path).fetch().await, Err(Error::Source(_))));
    }
}
