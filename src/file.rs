use std::fs::{self, Permissions};
use std::path::{Path, PathBuf};

use crate::error::{RepackError, Result};

/// A source file read into memory
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// Raw file content
    pub bytes: Vec<u8>,
    /// Permission bits to restore when writing back
    pub permissions: Permissions,
    /// BLAKE3 hash of the content (hex-encoded)
    pub checksum: String,
}

/// BLAKE3 hex digest of `bytes`
pub fn checksum(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Read a file from disk along with its permissions
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(SourceFile)` - File content with metadata
/// * `Err(RepackError::Io)` - The file could not be read
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<SourceFile> {
    let path = path.as_ref();

    let permissions = fs::metadata(path)
        .map_err(|e| RepackError::io(path, e))?
        .permissions();
    let bytes = fs::read(path).map_err(|e| RepackError::io(path, e))?;
    let checksum = checksum(&bytes);

    Ok(SourceFile {
        path: path.to_path_buf(),
        bytes,
        permissions,
        checksum,
    })
}

/// Replace the content of `path` in place, keeping `permissions`
///
/// The content goes to a sibling temporary file first and is renamed over
/// the original, so a failed write leaves the original untouched.
pub fn write_in_place(path: &Path, content: &[u8], permissions: Permissions) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| RepackError::Config(format!("not a file path: {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}.repack.tmp", file_name.to_string_lossy()));

    let written = fs::write(&tmp_path, content)
        .and_then(|()| fs::set_permissions(&tmp_path, permissions))
        .and_then(|()| fs::rename(&tmp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(RepackError::io(path, e));
    }
    Ok(())
}
