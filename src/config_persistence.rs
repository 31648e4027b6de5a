//! Comment-preserving TOML persistence for [`Config`].
//!
//! Writes are targeted: only keys whose values actually changed are touched,
//! and existing key decor (comments, whitespace) is preserved. Load failures
//! fall back to defaults rather than propagating.

use std::path::{Path, PathBuf};

use log::warn;
use toml_edit::{value, DocumentMut, Item, Table};

use crate::config::Config;

fn set_table_value_preserving_decor(table: &mut Table, key: &str, item: Item) {
    let existing_value_decor = table
        .get(key)
        .and_then(|current| current.as_value().map(|existing| existing.decor().clone()));
    table[key] = item;
    if let Some(existing_value_decor) = existing_value_decor {
        if let Some(next_value) = table[key].as_value_mut() {
            *next_value.decor_mut() = existing_value_decor;
        }
    }
}

fn set_table_scalar_if_changed<T, F>(
    table: &mut Table,
    key: &str,
    previous_value: T,
    next_value: T,
    to_item: F,
) where
    T: PartialEq + Copy,
    F: FnOnce(T) -> Item,
{
    if table.contains_key(key) && previous_value == next_value {
        return;
    }
    set_table_value_preserving_decor(table, key, to_item(next_value));
}

fn ensure_section_table(document: &mut DocumentMut, key: &str) {
    let root = document.as_table_mut();
    let should_replace = !matches!(root.get(key), Some(item) if item.is_table());
    if should_replace {
        root.insert(key, Item::Table(Table::new()));
    }
}

fn write_config_to_document(document: &mut DocumentMut, previous: &Config, config: &Config) {
    ensure_section_table(document, "queue");
    ensure_section_table(document, "sync");

    {
        let queue = document["queue"]
            .as_table_mut()
            .expect("queue should be a table");
        set_table_scalar_if_changed(
            queue,
            "max_size",
            previous.queue.max_size as i64,
            config.queue.max_size as i64,
            value,
        );
    }

    {
        let sync = document["sync"]
            .as_table_mut()
            .expect("sync should be a table");
        set_table_scalar_if_changed(
            sync,
            "push_changed_on_session_start",
            previous.sync.push_changed_on_session_start,
            config.sync.push_changed_on_session_start,
            value,
        );
    }
}

/// Rewrites `existing_text` to reflect `config` while keeping comments and
/// formatting of untouched keys intact.
pub fn serialize_config_with_preserved_comments(
    existing_text: &str,
    config: &Config,
) -> Result<String, String> {
    let previous = toml::from_str::<Config>(existing_text)
        .map_err(|err| format!("failed to parse existing config as Config: {}", err))?;
    let mut document = existing_text
        .parse::<DocumentMut>()
        .map_err(|err| format!("failed to parse existing config as TOML document: {}", err))?;
    write_config_to_document(&mut document, &previous, config);
    Ok(document.to_string())
}

/// Persists `config` to `path`, preserving comments when the file already
/// exists. Failures are logged, never propagated.
pub fn persist_config_file(config: &Config, path: &Path) {
    let existing_text = std::fs::read_to_string(path).ok();
    let config_text = if let Some(existing_text) = existing_text {
        match serialize_config_with_preserved_comments(&existing_text, config) {
            Ok(updated_text) => Some(updated_text),
            Err(err) => {
                warn!(
                    "Failed to preserve config comments for {} ({}). Falling back to plain serialization.",
                    path.display(),
                    err
                );
                toml::to_string(config).ok()
            }
        }
    } else {
        toml::to_string(config).ok()
    };

    let Some(config_text) = config_text else {
        log::error!("Failed to serialize config for {}", path.display());
        return;
    };

    if let Err(err) = std::fs::write(path, config_text) {
        log::error!("Failed to persist config to {}: {}", path.display(), err);
    }
}

/// Loads the config from `path`, falling back to defaults when the file is
/// missing or malformed.
pub fn load_config_file(path: &Path) -> Config {
    let config_content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(
                "Failed to read config file {}. Using defaults. error={}",
                path.display(),
                err
            );
            return Config::default();
        }
    };

    match toml::from_str::<Config>(&config_content) {
        Ok(config) => config,
        Err(err) => {
            warn!(
                "Failed to parse config file {}. Using defaults. error={}",
                path.display(),
                err
            );
            Config::default()
        }
    }
}

/// Default location of `config.toml` under the user config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("playqueue")
        .join("config.toml")
}
