use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;

/// Line-based operator I/O.
///
/// Generic over the streams so prompts can be driven from memory in tests;
/// the binary uses locked stdin/stdout.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt.bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Yes/no question; empty answer or end of input means no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let Some(answer) = self.ask(&format!("{question} [y/N] "))? else {
                return Ok(false);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => self.problem("please answer y or n")?,
            }
        }
    }

    /// Per-track header line.
    pub fn banner(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{} {}", "=>".cyan().bold(), text)
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn success(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text.to_string().green())
    }

    pub fn problem(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text.to_string().red())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
