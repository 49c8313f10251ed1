//! Line format of the catalog file
//!
//! ```text
//! isbn|title|authors|year|genre|borrowed|borrowDate
//! 9780132350884|Clean Code|Robert C. Martin|2008|Programming|false|-
//! 9780201485677|Refactoring|Martin Fowler|1999|Programming|true|14-02-2025
//! ```
//!
//! There is no header and no escaping, so no field may contain `|` or a line break.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::record::{DATE_FORMAT, Loan, NO_DATE, Record};

pub const DELIMITER: char = '|';

const FIELD_COUNT: usize = 7;

/// Columns of a catalog line, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Isbn,
    Title,
    Authors,
    Year,
    Genre,
    Borrowed,
    BorrowDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isbn => write!(f, "ISBN"),
            Self::Title => write!(f, "title"),
            Self::Authors => write!(f, "authors"),
            Self::Year => write!(f, "year"),
            Self::Genre => write!(f, "genre"),
            Self::Borrowed => write!(f, "borrowed"),
            Self::BorrowDate => write!(f, "borrow date"),
        }
    }
}

/// How the year column is read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearParsing {
    /// Anything but an integer rejects the line
    #[default]
    Strict,
    /// Legacy behaviour: use the leading integer, or 0 when there is none
    Lenient,
}

/// Render a record as one catalog line, without the line terminator
pub fn encode(record: &Record) -> String {
    format!(
        "{isbn}{d}{title}{d}{authors}{d}{year}{d}{genre}{d}{borrowed}{d}{date}",
        d = DELIMITER,
        isbn = record.isbn,
        title = record.title,
        authors = record.authors,
        year = record.year,
        genre = record.genre,
        borrowed = record.borrowed_flag(),
        date = record.borrow_date_text(),
    )
}

/// Parse one catalog line
pub fn decode(line: &str, year_parsing: YearParsing) -> Result<Record, ParseError> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return Err(ParseError::MissingField(Field::Isbn));
    }

    let mut parts = line.split(DELIMITER);
    let mut next = |field: Field| parts.next().ok_or(ParseError::MissingField(field));

    let isbn = next(Field::Isbn)?;
    let title = next(Field::Title)?;
    let authors = next(Field::Authors)?;
    let year = next(Field::Year)?;
    let genre = next(Field::Genre)?;
    let borrowed = next(Field::Borrowed)?;
    let date = next(Field::BorrowDate)?;

    let extra = parts.count();
    if extra > 0 {
        return Err(ParseError::ExtraFields {
            count: FIELD_COUNT + extra,
        });
    }

    Ok(Record {
        isbn: isbn.to_string(),
        title: title.to_string(),
        authors: authors.to_string(),
        year: parse_year(year, year_parsing)?,
        genre: genre.to_string(),
        loan: parse_loan(borrowed, date)?,
    })
}

fn parse_year(raw: &str, year_parsing: YearParsing) -> Result<i32, ParseError> {
    match year_parsing {
        YearParsing::Strict => raw
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidYear(raw.to_string())),
        YearParsing::Lenient => Ok(leading_integer(raw)),
    }
}

/// Sign and digits at the start of `raw`, 0 when there are none
fn leading_integer(raw: &str) -> i32 {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(matches!(trimmed.as_bytes().first(), Some(b'-' | b'+')));
    let digits_len = trimmed[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    // Sign and digits parse together so i32::MIN stays representable
    trimmed[..sign_len + digits_len].parse::<i32>().unwrap_or(0)
}

fn parse_loan(borrowed: &str, date: &str) -> Result<Loan, ParseError> {
    let inconsistent = || ParseError::InconsistentLoan {
        borrowed: borrowed.to_string(),
        date: date.to_string(),
    };

    match borrowed {
        "false" if date == NO_DATE => Ok(Loan::Available),
        "false" => Err(inconsistent()),
        "true" => NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map(|since| Loan::Borrowed { since })
            .map_err(|_| inconsistent()),
        other => Err(ParseError::InvalidBorrowedFlag(other.to_string())),
    }
}
