//! Console rendering of records

use std::io::{self, Write};

use colored::Colorize;

use crate::record::Record;

/// Full details of one record
pub fn write_details(out: &mut impl Write, record: &Record) -> io::Result<()> {
    writeln!(out, "{} {}", "ISBN:".bold(), record.isbn)?;
    writeln!(out, "{} {}", "Title:".bold(), record.title)?;
    writeln!(out, "{} {}", "Authors:".bold(), record.authors)?;
    writeln!(out, "{} {}", "Year:".bold(), record.year)?;
    writeln!(out, "{} {}", "Genre:".bold(), record.genre)?;
    writeln!(out, "{} {}", "Borrowed:".bold(), record.borrowed_flag())?;
    writeln!(out, "{} {}", "Date:".bold(), record.borrow_date_text())
}

/// One line per record: `Title (ISBN: ...)`, optionally numbered from 1
pub fn write_summary(out: &mut impl Write, number: Option<usize>, record: &Record) -> io::Result<()> {
    let status = if record.is_borrowed() {
        format!(" [borrowed {}]", record.borrow_date_text()).yellow().to_string()
    } else {
        String::new()
    };
    match number {
        Some(n) => writeln!(out, "{}. {} (ISBN: {}){}", n, record.title, record.isbn, status),
        None => writeln!(out, "{} (ISBN: {}){}", record.title, record.isbn, status),
    }
}

/// Borrowed books with the date they went out
pub fn write_borrowed(out: &mut impl Write, records: &[&Record]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No books are currently borrowed.");
    }
    writeln!(out, "{}", "Books currently borrowed:".bright_cyan())?;
    for record in records {
        writeln!(out, "ISBN: {}", record.isbn)?;
        writeln!(out, "Title: {}", record.title)?;
        writeln!(out, "Author(s): {}", record.authors)?;
        writeln!(out, "Borrowed on: {}", record.borrow_date_text())?;
        writeln!(out)?;
    }
    Ok(())
}

/// Records as a JSON array
pub fn write_json<'a>(out: &mut impl Write, records: impl IntoIterator<Item = &'a Record>) -> io::Result<()> {
    let records: Vec<&Record> = records.into_iter().collect();
    serde_json::to_writer_pretty(&mut *out, &records)?;
    writeln!(out)
}
