//! In-memory record store mirrored to a flat file
//!
//! The whole file is read on [`Store::load`] and rewritten on every
//! [`Store::flush`]. There is no locking: one process at a time.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::codec::{self, YearParsing};
use crate::error::{ParseError, StoreError};
use crate::record::Record;

/// A line that was skipped while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file
    pub line_number: usize,
    /// The line as read, without its terminator
    pub content: String,
    /// Why it was skipped
    pub error: ParseError,
}

/// Result of loading a catalog file
#[derive(Debug, Default)]
pub struct LoadReport {
    pub store: Store,
    pub skipped: Vec<SkippedLine>,
}

/// Ordered collection of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    records: Vec<Record>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every record from `path`
    ///
    /// A missing file is created empty. Lines that do not decode are skipped
    /// and reported in [`LoadReport::skipped`].
    pub fn load(path: impl AsRef<Path>, year_parsing: YearParsing) -> Result<LoadReport, StoreError> {
        let path = path.as_ref();
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Catalog file missing, creating a new one");
                create_empty(path)?;
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let mut report = LoadReport::default();
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| StoreError::io(path, e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let decoded = match std::str::from_utf8(&buf) {
                Ok(line) => codec::decode(line, year_parsing),
                Err(_) => Err(ParseError::NotUtf8),
            };

            match decoded {
                Ok(record) => report.store.insert(record)?,
                Err(error) => {
                    let content = String::from_utf8_lossy(&buf).trim_end_matches(['\r', '\n']).to_string();
                    warn!(line_number, %error, line = %content, "Skipping malformed catalog line");
                    report.skipped.push(SkippedLine {
                        line_number,
                        content,
                        error,
                    });
                }
            }
        }

        debug!(
            path = %path.display(),
            records = report.store.len(),
            skipped = report.skipped.len(),
            "Loaded catalog"
        );
        Ok(report)
    }

    /// Rewrite `path` with the current records, in order
    pub fn flush(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let file = fs::File::create(path).map_err(|e| StoreError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        for record in &self.records {
            writeln!(writer, "{}", codec::encode(record)).map_err(|e| StoreError::io(path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))?;

        debug!(path = %path.display(), records = self.records.len(), "Flushed catalog");
        Ok(())
    }

    /// Append a record; duplicates are not checked here
    pub fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        self.records.try_reserve(1)?;
        self.records.push(record);
        Ok(())
    }

    /// Remove the record at `index`, shifting later records down by one
    pub fn remove_at(&mut self, index: usize) -> Result<Record, StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

fn create_empty(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    fs::File::create(path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Field;
    use crate::record::Loan;
    use tempfile::TempDir;

    fn book(isbn: &str, title: &str) -> Record {
        Record {
            isbn: isbn.to_string(),
            title: title.to_string(),
            authors: "Someone".to_string(),
            year: 2000,
            genre: "Fiction".to_string(),
            loan: Loan::Available,
        }
    }

    fn titles(store: &Store) -> Vec<&str> {
        store.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_load_missing_file_creates_it() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("books.db");

        let report = Store::load(&path, YearParsing::Strict).unwrap();
        assert!(report.store.is_empty());
        assert!(report.skipped.is_empty());
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_flush_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.db");

        let mut store = Store::new();
        store.insert(book("1111111111111", "First")).unwrap();
        store.insert(book("2222222222222", "Second")).unwrap();
        store.flush(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "1111111111111|First|Someone|2000|Fiction|false|-\n\
             2222222222222|Second|Someone|2000|Fiction|false|-\n"
        );

        let report = Store::load(&path, YearParsing::Strict).unwrap();
        assert_eq!(report.store, store);
    }

    #[test]
    fn test_insert_flush_load_adds_one() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.db");

        let mut store = Store::new();
        store.insert(book("1111111111111", "First")).unwrap();
        store.flush(&path).unwrap();
        let before = Store::load(&path, YearParsing::Strict).unwrap().store.len();

        let added = book("3333333333333", "Third");
        store.insert(added.clone()).unwrap();
        store.flush(&path).unwrap();

        let reloaded = Store::load(&path, YearParsing::Strict).unwrap().store;
        assert_eq!(reloaded.len(), before + 1);
        assert!(reloaded.iter().any(|r| *r == added));
    }

    #[test]
    fn test_flush_truncates_previous_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.db");
        fs::write(&path, "stale line that should disappear\n".repeat(10)).unwrap();

        let mut store = Store::new();
        store.insert(book("1111111111111", "Only")).unwrap();
        store.flush(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_load_skips_short_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.db");
        fs::write(
            &path,
            "1111111111111|First|A|2000|G|false|-\n\
             2222222222222|Broken|A|2000|G\n\
             3333333333333|Third|A|2000|G|true|01-02-2024\n",
        )
        .unwrap();

        let report = Store::load(&path, YearParsing::Strict).unwrap();
        assert_eq!(titles(&report.store), vec!["First", "Third"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line_number, 2);
        assert_eq!(report.skipped[0].content, "2222222222222|Broken|A|2000|G");
        assert_eq!(report.skipped[0].error, ParseError::MissingField(Field::Borrowed));
    }

    #[test]
    fn test_load_skips_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.db");
        let mut bytes = b"1111111111111|First|A|2000|G|false|-\n".to_vec();
        bytes.extend_from_slice(b"2222222222222|\xff\xfe|A|2000|G|false|-\n");
        fs::write(&path, bytes).unwrap();

        let report = Store::load(&path, YearParsing::Strict).unwrap();
        assert_eq!(report.store.len(), 1);
        assert_eq!(report.skipped[0].error, ParseError::NotUtf8);
    }

    #[test]
    fn test_load_without_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.db");
        fs::write(&path, "1111111111111|First|A|2000|G|false|-").unwrap();

        let report = Store::load(&path, YearParsing::Strict).unwrap();
        assert_eq!(report.store.len(), 1);
    }

    #[test]
    fn test_load_many_records_keeps_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.db");

        let mut store = Store::new();
        for i in 0..35 {
            store.insert(book(&format!("{:013}", i), &format!("Book {i}"))).unwrap();
        }
        store.flush(&path).unwrap();

        let reloaded = Store::load(&path, YearParsing::Strict).unwrap().store;
        assert_eq!(reloaded.len(), 35);
        assert_eq!(reloaded.get(0).unwrap().title, "Book 0");
        assert_eq!(reloaded.get(34).unwrap().title, "Book 34");
    }

    #[test]
    fn test_remove_at_preserves_order() {
        let mut store = Store::new();
        for (isbn, title) in [("1", "A"), ("2", "B"), ("3", "C"), ("4", "D")] {
            store.insert(book(isbn, title)).unwrap();
        }

        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&store), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_remove_at_out_of_range_leaves_store() {
        let mut store = Store::new();
        store.insert(book("1", "A")).unwrap();
        let before = store.clone();

        let err = store.remove_at(1).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_flush_to_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = Store::new().flush(temp.path()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
