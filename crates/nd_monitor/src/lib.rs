pub mod cli;
pub mod logging;
pub mod monitor;
pub mod source;

pub use cli::{handle_command, HumanDuration, MonitorArgs, MonitorCommands};
pub use logging::{init_logging, Logger};
pub use monitor::{CycleReport, Monitor};
pub use source::{normalize_batch, JsonFileSource, StaticSource};

pub mod prelude {
    pub use super::monitor::{CycleReport, Monitor};
    pub use super::source::{JsonFileSource, StaticSource};
    pub use nd_core::{Article, ArticleSource, Error, Result};
}
