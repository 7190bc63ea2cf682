//! Entry point for the terminal translate demo.

use std::sync::Arc;

use langzone_i18n::TranslationContext;
use langzone_i18n::backend::HttpTranslator;
use langzone_i18n::bundle::ResourceBundle;
use langzone_i18n::config::ConfigManager;
use langzone_i18n::resolver::MemoryPreferenceStore;
use langzone_i18n::types::LanguageCode;
use tokio::io::{
    AsyncBufReadExt,
    AsyncWriteExt,
    BufReader,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(std::env::current_dir()?))?;
    let settings = config_manager.get_settings().clone();

    let bundle = ResourceBundle::load(
        &settings.resource_dir,
        &settings.available_languages,
        settings.default_language.clone(),
        &settings.key_separator,
    )?;

    let translator = Arc::new(HttpTranslator::from_settings(&settings.backend));
    let store = Arc::new(MemoryPreferenceStore::new());
    let context = TranslationContext::init(settings, bundle, translator, store);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"Type text to translate, \":lang <code>\" to switch language, Ctrl-D to quit.\n")
        .await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(code) = line.strip_prefix(":lang ") {
            let code = LanguageCode::new(code.trim());
            let message = if context.set_language(&code) {
                format!("Language set to '{code}'\n")
            } else {
                format!("Unknown language '{code}'\n")
            };
            stdout.write_all(message.as_bytes()).await?;
            stdout.flush().await?;
            continue;
        }

        let translated = context.translate(line).await;
        stdout.write_all(format!("{translated}\n").as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
