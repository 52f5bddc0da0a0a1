use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::Result;

/// Interactive questions asked by commands
pub trait Prompt {
    /// Yes/no question; anything but `y`/`yes` counts as no
    fn confirm(&mut self, question: &str) -> Result<bool>;

    fn ask(&mut self, question: &str) -> Result<String>;

    /// Question whose answer must not be echoed back or logged
    fn ask_secret(&mut self, question: &str) -> Result<String>;
}

/// Line-based prompt over any reader/writer pair.
///
/// Secrets are read from the tty without echo when stdin is a terminal.
pub struct TerminalPrompt<R: BufRead, W: Write> {
    input: R,
    output: W,
    assume_yes: bool,
    hide_secrets: bool,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(assume_yes: bool) -> Self {
        let stdin = io::stdin();
        let hide_secrets = stdin.is_terminal();
        Self {
            hide_secrets,
            ..Self::new(stdin.lock(), io::stdout(), assume_yes)
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
            hide_secrets: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self, question: &str, suffix: &str) -> Result<Option<String>> {
        write!(self.output, "{}{}", question, suffix)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            writeln!(self.output, "{} (y/n) y", question)?;
            return Ok(true);
        }

        let answer = self.read_answer(question, " (y/n) ")?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        Ok(self.read_answer(question, " ")?.unwrap_or_default())
    }

    fn ask_secret(&mut self, question: &str) -> Result<String> {
        if !self.hide_secrets {
            return Ok(self.read_answer(question, " ")?.unwrap_or_default());
        }

        self.output.flush()?;
        let secret = rpassword::prompt_password(format!("{} ", question))?;
        Ok(secret.trim().to_string())
    }
}
