//! LibraryCatalog - single-user book catalog
//!
//! CLI entry point: interactive menu by default, one-shot subcommands for scripting.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use librarycatalog::catalog::Catalog;
use librarycatalog::cli::{Cli, Command, OutputFormat};
use librarycatalog::config::Config;
use librarycatalog::error::CatalogError;
use librarycatalog::menu;
use librarycatalog::record::{NewRecord, Record};
use librarycatalog::render;
use librarycatalog::store::SkippedLine;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("librarycatalog")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("lc.log"))
        .context("Failed to open log file")?;

    // Log to a file so the menu is not interleaved with log lines
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    let path = cli.file.clone().unwrap_or_else(|| config.catalog_file.clone());
    info!(path = %path.display(), "librarycatalog starting");

    let (mut catalog, skipped) = Catalog::open(&path, config.catalog_options())
        .context(format!("Could not load the catalog from {}", path.display()))?;
    report_skipped(&skipped);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run_interactive(&mut catalog)?,
        Command::List { format } => {
            if catalog.is_empty() && format == OutputFormat::Text {
                println!("No books in the catalog");
            } else {
                print_records(catalog.records(), format)?;
            }
        }
        Command::Find { title, format } => {
            let hits = catalog.find_by_title(&title);
            match format {
                OutputFormat::Json => render::write_json(&mut io::stdout().lock(), hits.iter().map(|h| h.record))?,
                OutputFormat::Text if hits.is_empty() => {
                    println!("No books found with title containing: {}", title);
                }
                OutputFormat::Text => {
                    let mut out = io::stdout().lock();
                    for (n, hit) in hits.iter().enumerate() {
                        render::write_summary(&mut out, Some(n + 1), hit.record)?;
                    }
                }
            }
        }
        Command::Show { isbn, format } => {
            let record = catalog
                .find_by_isbn(&isbn)
                .ok_or_else(|| CatalogError::NotFound { isbn: isbn.clone() })?;
            match format {
                OutputFormat::Json => render::write_json(&mut io::stdout().lock(), [record])?,
                OutputFormat::Text => render::write_details(&mut io::stdout().lock(), record)?,
            }
        }
        Command::Borrowed { format } => {
            let borrowed = catalog.list_borrowed();
            match format {
                OutputFormat::Json => render::write_json(&mut io::stdout().lock(), borrowed)?,
                OutputFormat::Text => render::write_borrowed(&mut io::stdout().lock(), &borrowed)?,
            }
        }
        Command::Add {
            isbn,
            title,
            authors,
            year,
            genre,
        } => {
            let record = catalog.add(NewRecord::new(isbn, title, authors, year, genre))?;
            println!("{} Added: {} (ISBN: {})", "✓".green(), record.title, record.isbn.cyan());
        }
        Command::Borrow { isbn } => {
            let record = catalog.borrow(&isbn)?;
            println!(
                "{} Borrowed: {} on {}",
                "✓".green(),
                record.title,
                record.borrow_date_text()
            );
        }
        Command::Return { isbn } => {
            let record = catalog.return_book(&isbn)?;
            println!("{} Returned: {}", "✓".green(), record.title);
        }
        Command::Delete { isbn } => {
            let record = catalog.delete_by_isbn(&isbn)?;
            println!("{} Deleted: {} (ISBN: {})", "✓".green(), record.title, record.isbn);
        }
    }

    Ok(())
}

/// Tell the operator about catalog lines that were not loaded
fn report_skipped(skipped: &[SkippedLine]) {
    for line in skipped {
        eprintln!(
            "{} skipped line {}: {} ({})",
            "Warning:".yellow(),
            line.line_number,
            line.error,
            line.content.dimmed()
        );
    }
}

fn print_records(records: &[Record], format: OutputFormat) -> Result<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => render::write_json(&mut out, records)?,
        OutputFormat::Text => {
            for record in records {
                render::write_summary(&mut out, None, record)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
