pub mod config;
pub mod logging;
pub mod models;
pub mod paths;
pub mod source;
pub mod text;

pub use config::{Config, ConfigError, LogLevel, LoggingConfig, ValidationError};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use models::{Track, TrackId};
pub use paths::{AppDirs, DirsError};
pub use source::{MusicSource, ReadyCallback, SearchFocus};
pub use text::contains_case_insensitive;

pub const APP_NAME: &str = "musictime";
pub const APP_AUTHOR: &str = "MusicTime";
pub const APP_QUALIFIER: &str = "com";
