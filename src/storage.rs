//! JSON persistence of trained models and detection results

use std::fs;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::*;

/// Writes a value as pretty-printed JSON
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data)?;
    Ok(())
}

/// Reads a value back from a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
