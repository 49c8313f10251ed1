//! Error types for the catalog core

use std::collections::TryReserveError;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::codec::Field;

/// A line of the catalog file that could not be decoded into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing {0} field")]
    MissingField(Field),

    #[error("expected 7 fields, found {count}")]
    ExtraFields { count: usize },

    #[error("year is not an integer: '{0}'")]
    InvalidYear(String),

    #[error("borrowed flag must be 'true' or 'false', got '{0}'")]
    InvalidBorrowedFlag(String),

    #[error("borrow date '{date}' does not agree with borrowed flag '{borrowed}'")]
    InconsistentLoan { borrowed: String, date: String },

    #[error("line is not valid UTF-8")]
    NotUtf8,
}

/// Rejection of operator input when creating a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ISBN must contain exactly 13 digits, got {len}")]
    IsbnLength { len: usize },

    #[error("ISBN must contain only digits")]
    IsbnNotDigits,

    #[error("{field} is longer than the maximum of {max} characters ({len})")]
    TooLong { field: Field, max: usize, len: usize },

    #[error("year {year} is after the current year {current}")]
    YearInFuture { year: i32, current: i32 },

    #[error("{field} must not contain '|' or line breaks")]
    ForbiddenChar { field: Field },
}

/// Failures of the in-memory store and its backing file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("out of memory while growing the catalog: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("no record at index {index} (catalog holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Outcomes of catalog queries and mutations that are reported to the operator
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("book with ISBN {isbn} not found")]
    NotFound { isbn: String },

    #[error("book with ISBN {isbn} is already borrowed (since {})", .since.format(crate::record::DATE_FORMAT))]
    AlreadyBorrowed { isbn: String, since: NaiveDate },

    #[error("book with ISBN {isbn} was not borrowed")]
    NotBorrowed { isbn: String },

    #[error("a book with ISBN {isbn} already exists")]
    DuplicateIsbn { isbn: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The in-memory change was applied but writing the file failed
    #[error("change kept in memory but not saved: {0}")]
    Unsaved(#[source] StoreError),
}
