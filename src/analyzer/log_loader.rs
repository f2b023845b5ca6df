//! File I/O for day logs.
//!
//! The parser works on in-memory text, so a day log is read completely before
//! parsing starts.

use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::types::DayIndex;

/// Buffer size for reading log files (8KB).
const BUFFER_SIZE: usize = 8 * 1024;

/// Byte order mark some editors put at the start of UTF-8 files.
const UTF8_BOM: char = '\u{feff}';

/// Raw text of one day log.
#[derive(Debug, Clone)]
pub struct DayLog {
    pub day: DayIndex,
    pub path: PathBuf,
    pub contents: String,
}

/// Reader for a single day log file.
pub struct LogLoader {
    reader: BufReader<File>,
}

impl LogLoader {
    /// Open a day log.
    ///
    /// # Returns
    ///
    /// `Ok(LogLoader)` if the file opens successfully, `Err` otherwise.
    pub fn new(path: &Path) -> Result<Self, std::io::Error> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::with_capacity(BUFFER_SIZE, file),
        })
    }

    /// Read the whole file, dropping a leading byte order mark.
    pub fn read_all(mut self) -> Result<String, std::io::Error> {
        let mut contents = String::new();
        self.reader.read_to_string(&mut contents)?;
        if contents.starts_with(UTF8_BOM) {
            contents.replace_range(..UTF8_BOM.len_utf8(), "");
        }
        Ok(contents)
    }
}

/// Load the log for `day` from `path`.
pub fn load_day_log(day: DayIndex, path: &Path) -> anyhow::Result<DayLog> {
    let contents = LogLoader::new(path)
        .and_then(LogLoader::read_all)
        .with_context(|| format!("Failed to read log for day {} from {}", day, path.display()))?;

    log::debug!("Loaded day {} log {} ({} bytes)", day, path.display(), contents.len());

    Ok(DayLog {
        day,
        path: path.to_path_buf(),
        contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_day_log() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2024-01-01T00:00:00Z,a,b").unwrap();

        let log = load_day_log(3, file.path()).unwrap();
        assert_eq!(log.day, 3);
        assert_eq!(log.path, file.path());
        assert_eq!(log.contents, "2024-01-01T00:00:00Z,a,b\n");
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("\u{feff}line\n".as_bytes()).unwrap();

        let contents = LogLoader::new(file.path()).unwrap().read_all().unwrap();
        assert_eq!(contents, "line\n");
    }

    #[test]
    fn test_missing_file_names_day_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.log");

        let err = load_day_log(1, &path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("day 1"));
        assert!(message.contains("missing.log"));
    }
}
