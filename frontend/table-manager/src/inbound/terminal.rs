//! Line-oriented [`UserPrompt`] for the command-line front end.

use std::io::{self, BufRead, BufReader, Stdin, Stderr, Write};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::domain::ports::UserPrompt;

/// Prompts written to `output` and answered from `input`.
///
/// With `assume_yes` set, confirmations are accepted without reading input.
pub struct TerminalPrompt<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
    assume_yes: bool,
}

impl TerminalPrompt<BufReader<Stdin>, Stderr> {
    /// Prompt on stderr and read answers from stdin.
    #[must_use]
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr(), assume_yes)
    }
}

impl<R, W> TerminalPrompt<R, W> {
    /// Build a prompt over arbitrary streams.
    pub const fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
            assume_yes,
        }
    }

    /// Consume the prompt and return the output stream.
    pub fn into_output(self) -> W {
        self.output
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    fn write_line(&self, line: &str) {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = writeln!(output, "{line}").and_then(|()| output.flush()) {
            warn!(%error, "failed to write prompt");
        }
    }

    fn read_answer(&self) -> Option<String> {
        let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) => None,
            Ok(_) => Some(answer),
            Err(error) => {
                warn!(%error, "failed to read prompt answer");
                None
            }
        }
    }
}

impl<R, W> UserPrompt for TerminalPrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn alert(&self, message: &str) {
        self.write_line(message);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            self.write_line(&format!("{message} [y/N] y"));
            return true;
        }
        self.write_line(&format!("{message} [y/N]"));
        self.read_answer()
            .is_some_and(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}
