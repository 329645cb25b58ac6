use std::fs;
use std::path::Path;

use toml_edit::{DocumentMut, Item, Table, value};

use crate::io::board_io::BoardError;
use crate::model::config::BoardConfig;

/// Keys accepted by `set_value`
pub const SETTABLE_KEYS: &[&str] = &[
    "board.name",
    "board.user_id",
    "store.backend",
    "store.url",
    "store.table",
    "todos.default_category",
    "ui.dark",
];

/// Read the board config, returning both the parsed config and the raw
/// toml_edit document for formatting-preserving edits.
pub fn read_config(board_dir: &Path) -> Result<(BoardConfig, DocumentMut), BoardError> {
    let config_path = board_dir.join("config.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: BoardConfig = toml::from_str(&config_text)?;
    let doc: DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk
pub fn write_config(board_dir: &Path, doc: &DocumentMut) -> Result<(), BoardError> {
    let config_path = board_dir.join("config.toml");
    fs::write(&config_path, doc.to_string()).map_err(|e| BoardError::ReadError {
        path: config_path,
        source: e,
    })?;
    Ok(())
}

/// Set a single `section.field` key, creating the section if missing.
/// Values are type-checked per key; the rest of the document is untouched.
pub fn set_value(doc: &mut DocumentMut, key: &str, raw: &str) -> Result<(), BoardError> {
    if !SETTABLE_KEYS.contains(&key) {
        return Err(BoardError::UnknownKey(key.to_string()));
    }
    let invalid = || BoardError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    };
    let Some((section, field)) = key.split_once('.') else {
        return Err(BoardError::UnknownKey(key.to_string()));
    };

    let item = match key {
        "ui.dark" => value(raw.parse::<bool>().map_err(|_| invalid())?),
        "store.backend" => match raw {
            "file" | "rest" => value(raw),
            _ => return Err(invalid()),
        },
        _ if raw.trim().is_empty() => return Err(invalid()),
        _ => value(raw.trim()),
    };

    if !doc.contains_key(section) {
        doc[section] = Item::Table(Table::new());
    }
    doc[section][field] = item;
    Ok(())
}
