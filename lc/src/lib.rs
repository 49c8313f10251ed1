//! LibraryCatalog - single-user book catalog on a flat file
//!
//! Books are kept in memory in file order and mirrored to a pipe-delimited
//! text file, one book per line. Lookups are linear scans; every change
//! rewrites the whole file before returning.
//!
//! # File format
//!
//! ```text
//! isbn|title|authors|year|genre|borrowed|borrowDate
//! 1234567890123|Dune|Frank Herbert|1965|Science Fiction|false|-
//! ```
//!
//! The catalog is single-writer/single-reader: nothing locks the file, and
//! another process reading it during a rewrite may see it truncated.
//!
//! # Example
//!
//! ```ignore
//! use librarycatalog::{Catalog, CatalogOptions, NewRecord};
//!
//! let (mut catalog, skipped) = Catalog::open("books.db", CatalogOptions::default())?;
//! catalog.add(NewRecord::new("1234567890123", "Dune", "Frank Herbert", 1965, "Science Fiction"))?;
//! catalog.borrow("1234567890123")?;
//! let hits = catalog.find_by_title("dune");
//! ```
//!
//! # Modules
//!
//! - [`record`] - Book records and creation rules
//! - [`codec`] - Line encoding of records
//! - [`store`] - In-memory store, load and flush
//! - [`catalog`] - Queries and mutations that save on success
//! - [`menu`] - Interactive menu
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod catalog;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod menu;
pub mod record;
pub mod render;
pub mod store;

pub use catalog::{Catalog, CatalogOptions, TitleMatch};
pub use codec::{Field, YearParsing, decode, encode};
pub use config::Config;
pub use error::{CatalogError, ParseError, StoreError, ValidationError};
pub use record::{Loan, NewRecord, Record};
pub use store::{LoadReport, SkippedLine, Store};
