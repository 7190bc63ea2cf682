//! 設定モジュール

mod loader;
mod manager;
mod types;

pub use manager::ConfigManager;
pub use types::{
    BackendConfig,
    ConfigError,
    I18nSettings,
    ValidationError,
};
