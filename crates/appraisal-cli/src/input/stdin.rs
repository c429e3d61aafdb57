use serde_json::Value;
use std::io::{self, Read};

/// Read all of stdin when data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin_text() -> Result<Option<String>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    log::debug!("read {} bytes from stdin", buffer.len());
    Ok(Some(buffer))
}

/// Attempt to read JSON from stdin if data is being piped.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match read_stdin_text()? {
        Some(text) => Ok(Some(serde_json::from_str(text.trim())?)),
        None => Ok(None),
    }
}
