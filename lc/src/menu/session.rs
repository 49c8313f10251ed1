//! Menu session: main menu, search menu and per-book actions

use std::io::Write;

use colored::Colorize;
use eyre::Result;

use crate::catalog::Catalog;
use crate::error::{CatalogError, ValidationError};
use crate::record::{self, NewRecord, Record};
use crate::render;

use super::input::LineInput;

const RULE: &str = "----------------------";

/// Where control goes after a submenu returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Stay in the current menu
    Stay,
    /// Go back to the main menu
    MainMenu,
    /// Input ended or the operator asked to exit
    Quit,
}

/// Interactive menu over a catalog
pub struct MenuSession<'a, I, W> {
    catalog: &'a mut Catalog,
    input: I,
    out: W,
}

impl<'a, I: LineInput, W: Write> MenuSession<'a, I, W> {
    pub fn new(catalog: &'a mut Catalog, input: I, out: W) -> Self {
        Self { catalog, input, out }
    }

    /// Give back the input and output, e.g. to inspect what was written
    pub fn into_parts(self) -> (I, W) {
        (self.input, self.out)
    }

    /// Run the main menu until the operator exits or input ends
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "{} Total books: {}",
            "Catalog loaded.".bright_cyan(),
            self.catalog.len()
        )?;

        loop {
            writeln!(self.out, "{RULE}")?;
            writeln!(self.out, "{}", "Main menu:".bright_cyan())?;
            writeln!(self.out, "1. Find a book")?;
            writeln!(self.out, "2. Add a book")?;
            writeln!(self.out, "3. Return a book")?;
            writeln!(self.out, "4. End the program")?;
            writeln!(self.out, "{RULE}")?;

            let Some(choice) = self.prompt("Make your choice: ")? else {
                break;
            };
            let flow = match parse_choice(&choice, 4) {
                Some(1) => self.search_menu()?,
                Some(2) => self.add_book()?,
                Some(3) => self.return_book()?,
                Some(_) => Flow::Quit,
                None => {
                    writeln!(self.out, "Please enter a number from 1 to 4.")?;
                    Flow::Stay
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }

        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    fn search_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.out, "{RULE}")?;
            writeln!(self.out, "{}", "Search menu:".bright_cyan())?;
            writeln!(self.out, "1. Find a book by its title")?;
            writeln!(self.out, "2. Find a book by its ISBN-13")?;
            writeln!(self.out, "3. Show borrowed books")?;
            writeln!(self.out, "4. Back to main menu")?;
            writeln!(self.out, "{RULE}")?;

            let Some(choice) = self.prompt("Make your choice: ")? else {
                return Ok(Flow::Quit);
            };
            let flow = match parse_choice(&choice, 4) {
                Some(1) => self.search_by_title()?,
                Some(2) => self.search_by_isbn()?,
                Some(3) => {
                    let borrowed = self.catalog.list_borrowed();
                    render::write_borrowed(&mut self.out, &borrowed)?;
                    Flow::Stay
                }
                Some(_) => return Ok(Flow::MainMenu),
                None => {
                    writeln!(self.out, "Invalid choice! Try again.")?;
                    Flow::Stay
                }
            };
            match flow {
                Flow::Stay => continue,
                other => return Ok(other),
            }
        }
    }

    fn search_by_title(&mut self) -> Result<Flow> {
        let Some(title) = self.prompt("Enter a title to search for: ")? else {
            return Ok(Flow::Quit);
        };

        let hits: Vec<(usize, Record)> = self
            .catalog
            .find_by_title(&title)
            .into_iter()
            .map(|hit| (hit.index, hit.record.clone()))
            .collect();
        if hits.is_empty() {
            writeln!(self.out, "No books found with title containing: {}", title)?;
            return Ok(Flow::Stay);
        }

        writeln!(self.out, "{}", "Books found:".bright_cyan())?;
        for (n, (_, record)) in hits.iter().enumerate() {
            render::write_summary(&mut self.out, Some(n + 1), record)?;
        }

        let Some(choice) = self.prompt("Choose a book by number (0 to cancel): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(n) = parse_choice(&choice, hits.len()) else {
            writeln!(self.out, "Returning to search menu...")?;
            return Ok(Flow::Stay);
        };

        let (index, record) = &hits[n - 1];
        writeln!(self.out, "You selected: {} (ISBN: {})", record.title, record.isbn)?;
        self.book_actions(*index, &record.isbn)
    }

    fn search_by_isbn(&mut self) -> Result<Flow> {
        let Some(isbn) = self.prompt("Enter ISBN to search: ")? else {
            return Ok(Flow::Quit);
        };
        let isbn = isbn.trim();

        let Some(index) = self.catalog.position_of_isbn(isbn) else {
            writeln!(self.out, "Book with ISBN {} not found.", isbn)?;
            return Ok(Flow::Stay);
        };
        if let Some(record) = self.catalog.get(index) {
            writeln!(self.out, "{}", "Book found:".bright_cyan())?;
            render::write_details(&mut self.out, record)?;
        }
        self.book_actions(index, isbn)
    }

    /// Offer borrow/delete for the book at `index`, whose ISBN is `isbn`
    fn book_actions(&mut self, index: usize, isbn: &str) -> Result<Flow> {
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "What would you like to do with this book?")?;
        writeln!(self.out, "1. Borrow the book")?;
        writeln!(self.out, "2. Delete the book")?;
        writeln!(self.out, "3. Back to search menu")?;
        writeln!(self.out, "4. Back to main menu")?;

        let Some(choice) = self.prompt("Choose what you want to do next: ")? else {
            return Ok(Flow::Quit);
        };
        match parse_choice(&choice, 4) {
            Some(1) => {
                let result = self
                    .catalog
                    .borrow(isbn)
                    .map(|r| format!("Book '{}' has been borrowed successfully!", r.title));
                self.report(result)?;
                Ok(Flow::Stay)
            }
            Some(2) => {
                let result = self
                    .catalog
                    .delete(index)
                    .map(|r| format!("Book '{}' deleted successfully!", r.title));
                self.report(result)?;
                Ok(Flow::Stay)
            }
            Some(3) => {
                writeln!(self.out, "Returning to search menu...")?;
                Ok(Flow::Stay)
            }
            Some(_) => Ok(Flow::MainMenu),
            None => {
                writeln!(self.out, "Invalid action. Returning to search menu...")?;
                Ok(Flow::Stay)
            }
        }
    }

    fn add_book(&mut self) -> Result<Flow> {
        writeln!(self.out, "{RULE}")?;
        writeln!(self.out, "{}", "Adding a new book:".bright_cyan())?;

        let Some(isbn) = self.prompt_valid("Enter ISBN (13 digits): ", record::validate_isbn)? else {
            return Ok(Flow::Quit);
        };
        let Some(title) = self.prompt_valid("Enter book title: ", record::validate_title)? else {
            return Ok(Flow::Quit);
        };
        let Some(authors) = self.prompt_valid("Enter author(s) (separated by commas): ", record::validate_authors)?
        else {
            return Ok(Flow::Quit);
        };
        let Some(year) = self.prompt_year()? else {
            return Ok(Flow::Quit);
        };
        let Some(genre) = self.prompt_valid("Enter genre(s) (separated by commas): ", record::validate_genre)? else {
            return Ok(Flow::Quit);
        };

        let result = self
            .catalog
            .add(NewRecord::new(isbn, title, authors, year, genre))
            .map(|r| format!("Book '{}' added successfully!", r.title));
        self.report(result)?;
        Ok(Flow::Stay)
    }

    fn return_book(&mut self) -> Result<Flow> {
        writeln!(self.out, "{RULE}")?;
        let Some(isbn) = self.prompt("Enter the ISBN of the book to return: ")? else {
            return Ok(Flow::Quit);
        };
        let result = self
            .catalog
            .return_book(isbn.trim())
            .map(|r| format!("Book '{}' has been returned successfully!", r.title));
        self.report(result)?;
        Ok(Flow::Stay)
    }

    /// Ask until `validate` accepts the answer
    fn prompt_valid(
        &mut self,
        prompt: &str,
        validate: fn(&str) -> Result<(), ValidationError>,
    ) -> Result<Option<String>> {
        loop {
            let Some(answer) = self.prompt(prompt)? else {
                return Ok(None);
            };
            match validate(&answer) {
                Ok(()) => return Ok(Some(answer)),
                Err(e) => writeln!(self.out, "{} {}", "Error:".red(), e)?,
            }
        }
    }

    fn prompt_year(&mut self) -> Result<Option<i32>> {
        let current = record::current_year();
        loop {
            let Some(answer) = self.prompt("Enter year of publication: ")? else {
                return Ok(None);
            };
            let year = match answer.trim().parse::<i32>() {
                Ok(year) => year,
                Err(_) => {
                    writeln!(self.out, "{} year must be a whole number", "Error:".red())?;
                    continue;
                }
            };
            match record::validate_year(year, current) {
                Ok(()) => return Ok(Some(year)),
                Err(e) => writeln!(self.out, "{} {}", "Error:".red(), e)?,
            }
        }
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(self.input.read_line(prompt)?.map(record::strip_line_breaks))
    }

    /// Tell the operator how a mutation went
    fn report(&mut self, result: Result<String, CatalogError>) -> Result<()> {
        match result {
            Ok(message) => writeln!(self.out, "{} {}", "✓".green(), message)?,
            Err(CatalogError::Unsaved(e)) => writeln!(
                self.out,
                "{} change applied but the catalog could not be saved: {}",
                "Warning:".yellow(),
                e
            )?,
            Err(e) => writeln!(self.out, "{} {}", "Error:".red(), e)?,
        }
        Ok(())
    }
}

/// Parse a 1-based menu choice no greater than `max`
fn parse_choice(input: &str, max: usize) -> Option<usize> {
    input.trim().parse().ok().filter(|n| (1..=max).contains(n))
}
