use nd_core::{Article, ArticleStore, Error, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The collection as a single JSON array on disk, read and written whole.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, raw: &str) -> Result<Vec<Article>> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Array(items) = value else {
            return Err(Error::MalformedStore(format!(
                "{} does not hold a JSON array",
                self.path.display()
            )));
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                if !item.is_object() {
                    return Err(Error::MalformedStore(format!(
                        "entry {} of {} is not an object",
                        i,
                        self.path.display()
                    )));
                }
                Ok(serde_json::from_value(item)?)
            })
            .collect()
    }
}

impl ArticleStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Article>> {
        let raw = fs::read_to_string(&self.path)?;
        let articles = self.parse(&raw)?;
        debug!("Loaded {} articles from {}", articles.len(), self.path.display());
        Ok(articles)
    }

    fn save(&mut self, articles: &[Article]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(articles)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} articles to {}", articles.len(), self.path.display());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
