//! Interactive menu for the catalog
//!
//! Numbered menus for finding, adding, borrowing, returning and deleting
//! books. Every change goes through [`Catalog`](crate::catalog::Catalog) and is
//! saved before the next prompt.

mod input;
mod session;

pub use input::{Editor, LineInput, ScriptedInput};
pub use session::MenuSession;

use eyre::Result;

use crate::catalog::Catalog;

/// Run the menu on the terminal
///
/// This is the main entry point for `lc` without a subcommand.
pub fn run_interactive(catalog: &mut Catalog) -> Result<()> {
    let editor = Editor::new()?;
    let mut session = MenuSession::new(catalog, editor, std::io::stdout());
    session.run()
}
