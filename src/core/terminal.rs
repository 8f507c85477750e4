//! Interactive input and console output.
//!
//! The push flow talks to the user only through [`Terminal`], so tests can
//! script the answers and collect the printed lines.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::core::error::{PushError, Result};
use crate::core::style;

pub trait Terminal {
    /// Print one line for the user.
    fn say(&mut self, line: &str);

    /// Ask a question and return the answer without its line ending.
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Ask until the answer is something other than whitespace, then trim it.
pub fn ask_required<T: Terminal + ?Sized>(term: &mut T, question: &str) -> Result<String> {
    loop {
        let answer = term.ask(question)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Stdout/stdin terminal.
pub struct Console<R = io::StdinLock<'static>, W = io::Stdout> {
    input: R,
    output: W,
}

impl Console {
    pub fn stdio() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Terminal for Console<R, W> {
    fn say(&mut self, line: &str) {
        // Nothing sensible to do if stdout is gone
        let _ = writeln!(self.output, "{}", line);
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}\n{}", question, style::prompt_marker())?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(PushError::InputClosed);
        }
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Terminal with pre-recorded answers, for non-interactive runs and tests.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    pub questions: Vec<String>,
    pub lines: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Everything printed so far, one line per entry.
    pub fn transcript(&self) -> String {
        self.lines.join("\n")
    }
}

impl Terminal for ScriptedTerminal {
    fn say(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.questions.push(question.to_string());
        self.answers.pop_front().ok_or(PushError::InputClosed)
    }
}
