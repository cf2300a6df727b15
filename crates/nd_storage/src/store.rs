use std::path::{Path, PathBuf};

use chrono::Local;
use nd_analysis::{regroup, GroupingStats};
use nd_core::{Article, ArticleStore, Config, GroupingMode, MergeSummary, Result};
use tracing::{info, warn};

use crate::merge::merge_articles;

/// Read-modify-write operations over a backend.
///
/// Grouping passes read fail-closed: an unreadable store aborts the pass
/// without writing. Merges read fail-open: an unreadable store counts as
/// empty.
pub struct Store<S: ArticleStore> {
    backend: S,
    config: Config,
}

impl<S: ArticleStore> Store<S> {
    pub fn new(backend: S, config: Config) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates an empty collection if the store does not exist yet.
    pub fn initialize(&mut self) -> Result<()> {
        if !self.backend.exists() {
            self.backend.save(&[])?;
            info!("Initialized empty store at {}", self.backend.describe());
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Article>> {
        self.backend.load()
    }

    /// Current collection; a store that was never created reads as empty.
    pub fn snapshot(&self) -> Result<Vec<Article>> {
        if !self.backend.exists() {
            return Ok(Vec::new());
        }
        self.backend.load()
    }

    fn load_lenient(&self) -> Vec<Article> {
        match self.backend.load() {
            Ok(articles) => articles,
            Err(e) => {
                warn!(
                    "Could not read store at {}, treating as empty: {}",
                    self.backend.describe(),
                    e
                );
                Vec::new()
            }
        }
    }

    pub fn merge(&mut self, incoming: Vec<Article>) -> Result<MergeSummary> {
        let mut articles = self.load_lenient();
        let summary = merge_articles(&mut articles, incoming, self.config.retention_cap);
        self.backend.save(&articles)?;
        info!(
            "Saved {} new articles to {} ({} total)",
            summary.added,
            self.backend.describe(),
            summary.total
        );
        Ok(summary)
    }

    pub fn regroup(&mut self, mode: GroupingMode) -> Result<GroupingStats> {
        let mut articles = self.backend.load()?;
        if articles.is_empty() {
            return Ok(GroupingStats::default());
        }
        let stats = regroup(&mut articles, mode, &self.config);
        self.backend.save(&articles)?;
        info!(
            "Regrouped {} articles by {} into {} groups",
            stats.articles, mode, stats.groups
        );
        Ok(stats)
    }

    /// Writes a timestamped copy of the collection into `dir`.
    pub fn backup(&self, dir: &Path) -> Result<PathBuf> {
        let articles = self.backend.load()?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("backup_{}.json", Local::now().format("%Y%m%d%H%M")));
        std::fs::write(&path, serde_json::to_vec_pretty(&articles)?)?;
        info!("Backed up {} articles to {}", articles.len(), path.display());
        Ok(path)
    }
}
