//! Append-only record of the inputs passwords were generated from.
//!
//! One line per entry, deduplicated on exact line equality. Passwords are never
//! written here.

use crate::generator::GenerationRequest;
use anyhow::{Context, Result};
use log::info;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// `<service> <secret> <iteration> <min_length> -<flags>`
#[derive(Debug, Clone, Copy)]
pub struct HistoryEntry<'a> {
    pub service: &'a str,
    pub secret: &'a str,
    pub iteration: u64,
    pub request: &'a GenerationRequest,
}

impl fmt::Display for HistoryEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.service,
            self.secret,
            self.iteration,
            self.request.min_length,
            self.request.classes.flags()
        )
    }
}

pub struct History {
    path: PathBuf,
    file: File,
    entries: Vec<String>,
}

impl History {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("Failed to open history file {}", path.display()))?;

        let mut contents = String::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_string(&mut contents)
            .with_context(|| format!("Failed to read history file {}", path.display()))?;

        let entries = contents.lines().map(str::to_string).collect();

        Ok(Self {
            path,
            file,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, line: &str) -> bool {
        self.entries.iter().any(|entry| entry == line)
    }

    pub fn record(&mut self, line: &str) -> Result<()> {
        writeln!(self.file, "{}", line)
            .and_then(|_| self.file.flush())
            .with_context(|| format!("Failed to write history file {}", self.path.display()))?;

        self.entries.push(line.to_string());
        info!("Recorded history entry in {}", self.path.display());
        Ok(())
    }

    /// Returns `true` if the line was new and has been appended.
    pub fn record_if_absent(&mut self, line: &str) -> Result<bool> {
        if self.contains(line) {
            return Ok(false);
        }
        self.record(line)?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.file
            .set_len(0)
            .with_context(|| format!("Failed to clear history file {}", self.path.display()))?;

        self.entries.clear();
        info!("Cleared history file {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::{CharacterClass, ClassSet};
    use tempfile::TempDir;

    fn history_in(dir: &TempDir) -> History {
        History::open(dir.path().join("log")).unwrap()
    }

    #[test]
    fn test_entry_format() {
        let request = GenerationRequest::new(12, ClassSet::ALL);
        let entry = HistoryEntry {
            service: "github",
            secret: "correct horse",
            iteration: 0,
            request: &request,
        };
        assert_eq!(entry.to_string(), "github correct horse 0 12 -ulns");
    }

    #[test]
    fn test_entry_flags_follow_class_order() {
        let request = GenerationRequest::new(
            8,
            ClassSet::EMPTY
                .with(CharacterClass::Special)
                .with(CharacterClass::Digit),
        );
        let entry = HistoryEntry {
            service: "bank",
            secret: "",
            iteration: 2,
            request: &request,
        };
        assert_eq!(entry.to_string(), "bank  2 8 -ns");
    }

    #[test]
    fn test_open_creates_file() {
        let dir = TempDir::new().unwrap();
        let history = history_in(&dir);

        assert!(history.path().exists());
        assert!(history.entries().is_empty());
    }

    #[test]
    fn test_record_if_absent_deduplicates() {
        let dir = TempDir::new().unwrap();
        let mut history = history_in(&dir);

        assert!(history.record_if_absent("a b 0 12 -ulns").unwrap());
        assert!(!history.record_if_absent("a b 0 12 -ulns").unwrap());
        assert!(history.record_if_absent("a b 1 12 -ulns").unwrap());

        assert_eq!(history.entries(), ["a b 0 12 -ulns", "a b 1 12 -ulns"]);

        let contents = std::fs::read_to_string(history.path()).unwrap();
        assert_eq!(contents, "a b 0 12 -ulns\na b 1 12 -ulns\n");
    }

    #[test]
    fn test_reopen_loads_entries() {
        let dir = TempDir::new().unwrap();
        {
            let mut history = history_in(&dir);
            history.record("first 1 1 -u").unwrap();
            history.record("second 1 1 -l").unwrap();
        }

        let mut history = history_in(&dir);
        assert_eq!(history.entries(), ["first 1 1 -u", "second 1 1 -l"]);
        assert!(!history.record_if_absent("first 1 1 -u").unwrap());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let mut history = history_in(&dir);
        history.record("x y 0 4 -n").unwrap();

        history.clear().unwrap();
        assert!(history.entries().is_empty());
        assert_eq!(std::fs::read_to_string(history.path()).unwrap(), "");

        history.record("x y 1 4 -n").unwrap();
        assert_eq!(
            std::fs::read_to_string(history.path()).unwrap(),
            "x y 1 4 -n\n"
        );
    }
}
