//! JSON save/load for settings and history
//!
//! Writes go to a sibling `.tmp` file first and are then renamed over the
//! target, so a crash mid-write leaves the previous file intact.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Read `path` as JSON. A missing file yields `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&text)?))
}

/// Write `value` to `path` as pretty JSON via a temporary file
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("progressive-draw-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_is_none() {
        let loaded: Option<Vec<u32>> = load_json(&scratch("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("persist.json");
        let mut value = BTreeMap::new();
        value.insert("levels".to_string(), 12u32);
        save_json(&path, &value).unwrap();

        let loaded: BTreeMap<String, u32> = load_json(&path).unwrap().unwrap();
        assert_eq!(loaded, value);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = scratch("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let loaded: Result<Option<Vec<u32>>, _> = load_json(&path);
        assert!(matches!(loaded, Err(StoreError::Json(_))));
    }
}
