use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read_to_string(&canonical)?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a JSON file as a generic serde_json::Value.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    read_json(path)
}

/// Read a plain-text file (business plan text, raw extraction reply).
pub fn read_text(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    read_to_string(&canonical)
}

fn read_to_string(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    log::debug!("read {} bytes from {}", contents.len(), path.display());
    Ok(contents)
}

/// Resolve the path relative to the working directory and check it is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
