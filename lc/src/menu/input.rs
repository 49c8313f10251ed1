//! Line sources for the menu

use std::collections::VecDeque;

use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Something the menu can read operator input from
pub trait LineInput {
    /// Show `prompt` and read one line; `None` means the input is exhausted
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal input with line editing and history
pub struct Editor {
    rl: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self> {
        let rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { rl })
    }
}

impl LineInput for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.rl.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - ask again
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    return Ok(None);
                }
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            }
        }
    }
}

/// Pre-recorded input, one entry per prompt
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not consumed yet
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineInput for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_drains_in_order() {
        let mut input = ScriptedInput::new(["1", "dune"]);
        assert_eq!(input.read_line("> ").unwrap().as_deref(), Some("1"));
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.read_line("> ").unwrap().as_deref(), Some("dune"));
        assert_eq!(input.read_line("> ").unwrap(), None);
    }
}
