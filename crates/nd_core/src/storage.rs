use crate::types::Article;
use crate::Result;

/// Whole-collection persistence for analyzed articles.
///
/// Implementations read and write the entire ordered collection; there are
/// no partial updates.
pub trait ArticleStore: Send {
    /// Read the collection. A store that does not exist yet is an error.
    fn load(&self) -> Result<Vec<Article>>;

    /// Replace the collection.
    fn save(&mut self, articles: &[Article]) -> Result<()>;

    /// Whether the store has been created yet
    fn exists(&self) -> bool {
        true
    }

    /// Human readable location for logs
    fn describe(&self) -> String;
}

impl ArticleStore for Box<dyn ArticleStore> {
    fn load(&self) -> Result<Vec<Article>> {
        (**self).load()
    }

    fn save(&mut self, articles: &[Article]) -> Result<()> {
        (**self).save(articles)
    }

    fn exists(&self) -> bool {
        (**self).exists()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
