//! Utility functions for wordhoard.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, VocabError};

/// Maximum size of a document or vocabulary file read into memory (16 MB).
///
/// A knowledge document with a few thousand entries and a capped history is
/// well under 1 MB.
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Read a file into a string, refusing files larger than [`MAX_FILE_SIZE`].
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    read_to_string_with_limit(path, MAX_FILE_SIZE)
}

/// Read a file into a string with a custom size limit.
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| VocabError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(VocabError::storage(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file is too large ({} bytes, max {} bytes)", size, max_size),
            ),
        ));
    }

    fs::read_to_string(path).map_err(|e| VocabError::storage(path, e))
}
