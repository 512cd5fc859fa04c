//! Layered settings: providers, merging, reference expansion, lookup.

mod builder;
mod env;
mod error;
mod file;
mod memory;
mod resolve;
mod settings;
mod source;

pub use builder::SettingsBuilder;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use memory::MemorySource;
pub use settings::{
    connection_string_key, ConfigurationSource, Settings, CONNECTION_STRINGS_SECTION,
};
pub use source::{ConfigEntry, ConfigProvider, KEY_DELIMITER};
