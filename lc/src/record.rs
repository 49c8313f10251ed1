//! Book records
//!
//! A [`Record`] is one line of the catalog file. The borrow flag and borrow
//! date are carried together in [`Loan`], so a record can never claim to be
//! borrowed without a date or carry a date while available.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::codec::Field;
use crate::error::ValidationError;

/// Borrow dates are written as `DD-MM-YYYY`
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Placeholder written in the date column of an available book
pub const NO_DATE: &str = "-";

pub const ISBN_LEN: usize = 13;
pub const MAX_TITLE_LEN: usize = 50;
pub const MAX_AUTHORS_LEN: usize = 200;
pub const MAX_GENRE_LEN: usize = 100;

/// Borrow state of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Loan {
    #[default]
    Available,
    Borrowed {
        since: NaiveDate,
    },
}

/// One book in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// ISBN-13, the key used by every lookup
    pub isbn: String,

    /// Title
    pub title: String,

    /// Authors, comma separated by convention
    pub authors: String,

    /// Publication year
    pub year: i32,

    /// Genres, comma separated by convention
    pub genre: String,

    /// Borrow state
    pub loan: Loan,
}

impl Record {
    pub fn is_borrowed(&self) -> bool {
        matches!(self.loan, Loan::Borrowed { .. })
    }

    /// Date the book was borrowed, if it is out
    pub fn borrowed_since(&self) -> Option<NaiveDate> {
        match self.loan {
            Loan::Available => None,
            Loan::Borrowed { since } => Some(since),
        }
    }

    /// The borrowed column as written to disk: `true` or `false`
    pub fn borrowed_flag(&self) -> &'static str {
        if self.is_borrowed() { "true" } else { "false" }
    }

    /// The date column as written to disk: `DD-MM-YYYY` or `-`
    pub fn borrow_date_text(&self) -> String {
        match self.loan {
            Loan::Available => NO_DATE.to_string(),
            Loan::Borrowed { since } => since.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Operator-supplied fields for a book that is about to be added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub isbn: String,
    pub title: String,
    pub authors: String,
    pub year: i32,
    pub genre: String,
}

impl NewRecord {
    /// Build from raw input, dropping any line breaks the input carried
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        authors: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            isbn: strip_line_breaks(isbn.into()),
            title: strip_line_breaks(title.into()),
            authors: strip_line_breaks(authors.into()),
            year,
            genre: strip_line_breaks(genre.into()),
        }
    }

    /// Check every field against the creation rules
    pub fn validate(&self, current_year: i32) -> Result<(), ValidationError> {
        validate_isbn(&self.isbn)?;
        validate_title(&self.title)?;
        validate_authors(&self.authors)?;
        validate_year(self.year, current_year)?;
        validate_genre(&self.genre)?;
        Ok(())
    }

    /// Turn into a record that is not borrowed
    pub fn into_record(self) -> Record {
        Record {
            isbn: self.isbn,
            title: self.title,
            authors: self.authors,
            year: self.year,
            genre: self.genre,
            loan: Loan::Available,
        }
    }
}

/// Current year on the local clock
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn strip_line_breaks(mut text: String) -> String {
    text.retain(|c| c != '\n' && c != '\r');
    text
}

pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    let len = isbn.chars().count();
    if len != ISBN_LEN {
        return Err(ValidationError::IsbnLength { len });
    }
    if !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::IsbnNotDigits);
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    validate_text(Field::Title, title, MAX_TITLE_LEN)
}

pub fn validate_authors(authors: &str) -> Result<(), ValidationError> {
    validate_text(Field::Authors, authors, MAX_AUTHORS_LEN)
}

pub fn validate_genre(genre: &str) -> Result<(), ValidationError> {
    validate_text(Field::Genre, genre, MAX_GENRE_LEN)
}

pub fn validate_year(year: i32, current_year: i32) -> Result<(), ValidationError> {
    if year > current_year {
        return Err(ValidationError::YearInFuture {
            year,
            current: current_year,
        });
    }
    Ok(())
}

fn validate_text(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.contains(['|', '\n', '\r']) {
        return Err(ValidationError::ForbiddenChar { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    Ok(())
}
