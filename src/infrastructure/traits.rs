//! I/O boundary traits for testability
//!
//! These traits abstract file access, allowing services to be tested
//! with in-memory implementations.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Open a file for buffered line reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead>>;

    /// Create (or truncate) a file for buffered writing.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_create_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.inp");
        let fs = RealFileSystem;

        {
            let mut w = fs.create(&path).unwrap();
            writeln!(w, "1").unwrap();
            w.flush().unwrap();
        }

        assert!(fs.is_file(&path));
        assert!(fs.is_dir(temp.path()));
        assert_eq!(fs.read_to_string(&path).unwrap(), "1\n");
        let lines: Vec<String> = fs.open_read(&path).unwrap().lines().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["1"]);
    }
}
