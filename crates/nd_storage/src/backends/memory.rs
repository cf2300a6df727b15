use nd_core::{Article, ArticleStore, Error, Result};

/// In-process store, used by tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    articles: Option<Vec<Article>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            articles: Some(Vec::new()),
            writes: 0,
        }
    }

    /// A store that has never been written; loads fail until the first save.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: Some(articles),
            writes: 0,
        }
    }

    /// Number of successful saves
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ArticleStore for MemoryStore {
    fn load(&self) -> Result<Vec<Article>> {
        self.articles
            .clone()
            .ok_or_else(|| Error::Storage("memory store has not been initialized".to_string()))
    }

    fn save(&mut self, articles: &[Article]) -> Result<()> {
        self.articles = Some(articles.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.articles.is_some()
    }

    fn describe(&self) -> String {
        "memory://articles".to_string()
    }
}
