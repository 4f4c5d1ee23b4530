//! Interactive confirmation.
//!
//! Orchestration code takes a [`Confirm`] implementation instead of reading
//! standard input directly, so batch logic is testable with a canned
//! answer.

use std::io::{BufRead, Write};

/// Yes/no decision provider.
pub trait Confirm {
    /// Ask `question`; `default` is the answer for empty input.
    fn confirm(&self, question: &str, default: bool) -> std::io::Result<bool>;
}

/// Reads the answer from standard input.
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str, default: bool) -> std::io::Result<bool> {
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        let hint = if default { "[Y/n]" } else { "[y/N]" };

        loop {
            print!("{question} {hint} ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next() else {
                // EOF: take the default rather than hanging.
                return Ok(default);
            };
            match line?.trim().to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "ye" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please respond with 'yes' or 'no' (or 'y' or 'n')."),
            }
        }
    }
}

/// Always answers with a fixed decision. Used by tests.
#[cfg(test)]
pub struct StaticAnswer(pub bool);

#[cfg(test)]
impl Confirm for StaticAnswer {
    fn confirm(&self, _question: &str, _default: bool) -> std::io::Result<bool> {
        Ok(self.0)
    }
}
