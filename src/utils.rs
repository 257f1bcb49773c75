//! Utility functions for versa
//!
//! File helpers shared by the backup layer: reading a text file with a clear
//! error when it is not UTF-8, and writing a file atomically.

use crate::error::{Result, VersaError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::trace;

/// Read a whole file as UTF-8 text
///
/// # Errors
///
/// - [`VersaError::Persistence`] if the file cannot be read
/// - [`VersaError::Persistence`] if the content is not valid UTF-8
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        VersaError::persistence(format!("cannot read {}: {}", path.display(), e))
    })?;
    String::from_utf8(bytes).map_err(|_| {
        VersaError::persistence(format!("{} is not valid UTF-8 text", path.display()))
    })
}

/// Atomic file write (write to temp file then rename)
///
/// The temporary file is created next to the target so the final rename
/// never crosses a file system boundary. The target is either fully written
/// or left as it was.
///
/// # Errors
///
/// - [`VersaError::Io`] if the temporary file cannot be created or written
/// - [`VersaError::Io`] if the rename fails
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    trace!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}
