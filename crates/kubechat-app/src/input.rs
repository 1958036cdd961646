//! Line-oriented terminal input.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::error::CliError;

pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next line, or `None` at end of input.
    pub async fn next_line(&mut self) -> Result<Option<String>, CliError> {
        Ok(self.lines.next_line().await?)
    }

    /// Print `label` and read one line.
    pub async fn prompt(&mut self, label: &str) -> Result<Option<String>, CliError> {
        show_prompt(label)?;
        self.next_line().await
    }

    /// Like `prompt`, but asks again on blank input.
    pub async fn required(&mut self, label: &str) -> Result<String, CliError> {
        loop {
            match self.prompt(label).await? {
                None => return Err(CliError::InputClosed),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(line.trim().to_string()),
            }
        }
    }
}

pub fn show_prompt(label: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;
    Ok(())
}
