//! langzone-i18n
//!
//! Runtime translation pipeline for the LangZone frontend: static resource
//! bundles, prioritized language preference resolution, a process-lifetime
//! translation cache, and a subscribable translation context with lazy
//! backend translation.

pub mod backend;
pub mod bundle;
pub mod cache;
pub mod config;
pub mod context;
pub mod display;
pub mod resolver;
pub mod types;

// 主要な型を再エクスポート
pub use context::TranslationContext;
pub use display::TransText;
pub use types::{
    Language,
    LanguageCode,
};
