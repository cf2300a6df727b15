pub mod backends;
pub mod handle;
pub mod merge;
pub mod store;

pub use backends::*;
pub use handle::StoreHandle;
pub use merge::merge_articles;
pub use store::Store;

use nd_core::{ArticleStore, Config, Result};

/// Opens the store named by a CLI/config value: `memory` or a JSON file path.
pub fn create_store(location: &str) -> Result<Box<dyn ArticleStore>> {
    match location {
        "memory" | "memory://" => Ok(Box::new(MemoryStore::new())),
        path => Ok(Box::new(JsonFileStore::new(path))),
    }
}

/// Opens, initializes and spawns the owning task for the configured store.
pub fn spawn_store(location: &str, config: Config) -> Result<StoreHandle> {
    let mut store = Store::new(create_store(location)?, config);
    store.initialize()?;
    Ok(StoreHandle::spawn(store))
}

pub mod prelude {
    pub use super::{create_store, spawn_store, Store, StoreHandle};
    pub use super::backends::*;
}
