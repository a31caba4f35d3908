use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

// @module: File helpers for import and export

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @reads: Raw bytes of a file
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    // @reads: File as text, replacing invalid UTF-8 sequences
    pub fn read_to_string_lossy<P: AsRef<Path>>(path: P) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    // @writes: File contents atomically; readers never see a partial file
    pub fn write_atomic<P, F>(path: P, write: F) -> io::Result<()>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        write(temp.as_file_mut())?;
        temp.as_file_mut().flush()?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
