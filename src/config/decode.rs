//! Config file decoding with defaults and required keys
//!
//! Decoding runs in three steps:
//! - parse the file into a TOML table
//! - check that every key listed by [`Conf::required_fields`] appears in the
//!   file itself (a default does not satisfy a required key)
//! - lay the parsed table over the serialized [`Default`] value and
//!   deserialize the result
//!
//! Every missing key is reported at once through
//! [`ConfigError::MissingFields`].

use crate::errors::ConfigError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use toml::{Table, Value};

/// A config record that can be decoded from a TOML file.
pub trait Conf: Default + Serialize + DeserializeOwned {
    /// Keys that must be present in the file. Dotted keys address nested
    /// tables, e.g. `"log.level"`.
    fn required_fields() -> &'static [&'static str] {
        &[]
    }
}

/// Read and decode the config file at `path`.
pub fn parse_config_file<C: Conf>(path: impl AsRef<Path>) -> Result<C, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_config_str(&content, &path.display().to_string())
}

/// Decode `content`; `origin` names the source in errors.
pub fn decode_config_str<C: Conf>(content: &str, origin: &str) -> Result<C, ConfigError> {
    let parsed: Table = toml::from_str(content).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    let missing = missing_fields(&parsed, C::required_fields());
    if !missing.is_empty() {
        return Err(ConfigError::MissingFields {
            origin: origin.to_string(),
            fields: missing,
        });
    }

    let mut merged = defaults_table::<C>()?;
    merge_tables(&mut merged, parsed);

    let rendered = toml::to_string(&merged)?;
    toml::from_str(&rendered).map_err(|source| ConfigError::Decode {
        origin: origin.to_string(),
        source,
    })
}

fn defaults_table<C: Conf>() -> Result<Table, ConfigError> {
    let rendered = toml::to_string(&C::default())?;
    toml::from_str(&rendered).map_err(|source| ConfigError::Decode {
        origin: "<defaults>".to_string(),
        source,
    })
}

/// Overlay `overlay` onto `base`. Nested tables merge key by key; any other
/// value replaces the base value.
pub fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        if let Value::Table(incoming) = value {
            if let Some(Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

/// Required keys absent from `table`, in the order given.
pub fn missing_fields(table: &Table, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| !has_key(table, key))
        .map(|key| key.to_string())
        .collect()
}

fn has_key(table: &Table, key: &str) -> bool {
    let mut current = table;
    let mut parts = key.split('.').peekable();
    while let Some(part) = parts.next() {
        match current.get(part) {
            Some(Value::Table(inner)) if parts.peek().is_some() => current = inner,
            Some(_) => return parts.peek().is_none(),
            None => return false,
        }
    }
    false
}
