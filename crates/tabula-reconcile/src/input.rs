//! Reading SQL input.

use std::path::Path;

use crate::error::{ReconcileError, Result};

/// Reads a UTF-8 SQL file, dropping a leading byte-order mark.
///
/// # Errors
///
/// Fails when the file cannot be read or is not valid UTF-8.
pub fn read_sql_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let text =
        String::from_utf8(bytes).map_err(|_| ReconcileError::InvalidEncoding(path.to_path_buf()))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}
