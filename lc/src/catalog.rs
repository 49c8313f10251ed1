//! Queries and mutations over a store bound to its backing file
//!
//! Every successful mutation rewrites the whole file before returning, so the
//! cost of a single change is linear in the catalog size.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::codec::YearParsing;
use crate::error::{CatalogError, StoreError};
use crate::record::{Loan, NewRecord, Record, current_year};
use crate::store::{SkippedLine, Store};

/// Behaviour switches for a catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogOptions {
    /// How the year column is read when loading
    pub year_parsing: YearParsing,
    /// Reject `add` when the ISBN is already present
    pub unique_isbn: bool,
}

/// A title search hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleMatch<'a> {
    /// Position in the store
    pub index: usize,
    pub record: &'a Record,
}

/// The catalog: a store plus the file it is mirrored to
#[derive(Debug)]
pub struct Catalog {
    store: Store,
    path: PathBuf,
    options: CatalogOptions,
}

impl Catalog {
    /// Load the catalog at `path`, creating an empty file if needed
    pub fn open(path: impl AsRef<Path>, options: CatalogOptions) -> Result<(Self, Vec<SkippedLine>), CatalogError> {
        let path = path.as_ref().to_path_buf();
        let report = Store::load(&path, options.year_parsing)?;
        info!(
            path = %path.display(),
            records = report.store.len(),
            skipped = report.skipped.len(),
            "Opened catalog"
        );
        let catalog = Self {
            store: report.store,
            path,
            options,
        };
        Ok((catalog, report.skipped))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> CatalogOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.store.get(index)
    }

    /// First record whose ISBN is exactly `isbn`
    pub fn find_by_isbn(&self, isbn: &str) -> Option<&Record> {
        self.position_of_isbn(isbn).and_then(|index| self.store.get(index))
    }

    /// Store position of the first record whose ISBN is exactly `isbn`
    pub fn position_of_isbn(&self, isbn: &str) -> Option<usize> {
        self.store.iter().position(|r| r.isbn == isbn)
    }

    /// Records whose title contains `needle`, ignoring case, in store order
    pub fn find_by_title(&self, needle: &str) -> Vec<TitleMatch<'_>> {
        let needle = needle.to_lowercase();
        self.store
            .iter()
            .enumerate()
            .filter(|(_, r)| r.title.to_lowercase().contains(&needle))
            .map(|(index, record)| TitleMatch { index, record })
            .collect()
    }

    /// Records currently borrowed, in store order
    pub fn list_borrowed(&self) -> Vec<&Record> {
        self.store.iter().filter(|r| r.is_borrowed()).collect()
    }

    /// Validate and append a new book
    pub fn add(&mut self, new: NewRecord) -> Result<&Record, CatalogError> {
        new.validate(current_year())?;
        if self.options.unique_isbn && self.position_of_isbn(&new.isbn).is_some() {
            return Err(CatalogError::DuplicateIsbn { isbn: new.isbn });
        }

        self.store.insert(new.into_record())?;
        let index = self.store.len() - 1;
        info!(isbn = %self.records()[index].isbn, "Added book");
        self.commit()?;
        Ok(&self.records()[index])
    }

    /// Mark the book borrowed as of today
    pub fn borrow(&mut self, isbn: &str) -> Result<&Record, CatalogError> {
        self.borrow_on(isbn, chrono::Local::now().date_naive())
    }

    /// Mark the book borrowed as of `date`
    pub fn borrow_on(&mut self, isbn: &str, date: NaiveDate) -> Result<&Record, CatalogError> {
        let index = self.require(isbn)?;
        let record = self.record_mut(index)?;
        if let Loan::Borrowed { since } = record.loan {
            return Err(CatalogError::AlreadyBorrowed {
                isbn: isbn.to_string(),
                since,
            });
        }
        record.loan = Loan::Borrowed { since: date };
        info!(isbn, %date, "Borrowed book");
        self.commit()?;
        Ok(&self.records()[index])
    }

    /// Mark the book as back on the shelf
    pub fn return_book(&mut self, isbn: &str) -> Result<&Record, CatalogError> {
        let index = self.require(isbn)?;
        let record = self.record_mut(index)?;
        if record.loan == Loan::Available {
            return Err(CatalogError::NotBorrowed { isbn: isbn.to_string() });
        }
        record.loan = Loan::Available;
        info!(isbn, "Returned book");
        self.commit()?;
        Ok(&self.records()[index])
    }

    /// Remove the record at store position `index`
    pub fn delete(&mut self, index: usize) -> Result<Record, CatalogError> {
        let removed = self.store.remove_at(index)?;
        info!(index, isbn = %removed.isbn, "Deleted book");
        self.commit()?;
        Ok(removed)
    }

    /// Remove the first record whose ISBN is `isbn`
    pub fn delete_by_isbn(&mut self, isbn: &str) -> Result<Record, CatalogError> {
        let index = self.require(isbn)?;
        self.delete(index)
    }

    fn require(&self, isbn: &str) -> Result<usize, CatalogError> {
        self.position_of_isbn(isbn)
            .ok_or_else(|| CatalogError::NotFound { isbn: isbn.to_string() })
    }

    fn record_mut(&mut self, index: usize) -> Result<&mut Record, CatalogError> {
        let len = self.store.len();
        self.store
            .get_mut(index)
            .ok_or(CatalogError::Store(StoreError::IndexOutOfRange { index, len }))
    }

    fn commit(&self) -> Result<(), CatalogError> {
        match self.store.flush(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Committed change");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to save catalog");
                Err(CatalogError::Unsaved(e))
            }
        }
    }
}
