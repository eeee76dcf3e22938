//! Small file helpers shared by the file store and config loading.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{BoundariesError, Result};

/// Largest storage or config file we are willing to read (1 MB).
///
/// The key-value file holds a handful of flags and a settings blob; anything
/// near this size is not ours.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Read a file into a string, treating a missing file as `None`.
///
/// Errors if the file exists but cannot be read or is larger than `max_size`.
pub fn read_optional(path: &Path, max_size: u64) -> Result<Option<String>> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BoundariesError::storage(path, e)),
    };

    if metadata.len() > max_size {
        return Err(BoundariesError::storage(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "file too large ({} bytes, max {} bytes)",
                    metadata.len(),
                    max_size
                ),
            ),
        ));
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| BoundariesError::storage(path, e))
}

/// Write `content` to `path` atomically via a sibling temp file and rename.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| BoundariesError::storage(dir, e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "storage".to_string());
    let temp_path = dir.join(format!(".{}.tmp", file_name));

    {
        use std::io::Write;
        let mut file =
            fs::File::create(&temp_path).map_err(|e| BoundariesError::storage(&temp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| BoundariesError::storage(&temp_path, e))?;
        file.sync_all()
            .map_err(|e| BoundariesError::storage(&temp_path, e))?;
    }

    fs::rename(&temp_path, path).map_err(|e| BoundariesError::storage(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_optional_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.json");

        assert!(read_optional(&path, MAX_FILE_SIZE).unwrap().is_none());
    }

    #[test]
    fn test_read_optional_reads_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("present.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(
            read_optional(&path, MAX_FILE_SIZE).unwrap().as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn test_read_optional_rejects_oversized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("large.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[b'x'; 1000]).unwrap();

        let err = read_optional(&path, 500).unwrap_err().to_string();
        assert!(err.contains("too large"));
        assert!(err.contains("max 500 bytes"));
    }

    #[test]
    fn test_read_optional_at_boundary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("boundary.json");
        fs::write(&path, "x".repeat(100)).unwrap();

        assert!(read_optional(&path, 100).is_ok());
        assert!(read_optional(&path, 99).is_err());
    }

    #[test]
    fn test_atomic_write_creates_parent_and_cleans_temp() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("storage.json");

        atomic_write(&path, "{\"a\":\"b\"}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":\"b\"}");
        assert!(!temp
            .path()
            .join("nested")
            .join(".storage.json.tmp")
            .exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("storage.json");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
