use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::vizzard::*;

/// The interactive surface: questions and report sections go to `output`,
/// answers are read line by line from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

pub fn stdin_console() -> Console<StdinLock<'static>, Stdout> {
    Console::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Console<R, W> {
        Console { input, output }
    }

    pub fn say(&mut self, text: &str) -> VizzardResult<()> {
        write!(self.output, "{}", text).context(ConsoleSnafu {})?;
        self.output.flush().context(ConsoleSnafu {})
    }

    /// Asks a question and returns the trimmed answer.
    /// The end of the input counts as an empty answer.
    pub fn prompt(&mut self, question: &str) -> VizzardResult<String> {
        self.say(question)?;
        let mut line = String::new();
        let num_read = self.input.read_line(&mut line).context(ConsoleSnafu {})?;
        if num_read == 0 {
            debug!("prompt: end of input for {:?}", question.trim());
        }
        Ok(line.trim().to_string())
    }

    /// Uses the value given on the command line if any, asks for it otherwise.
    pub fn answer_or_prompt(
        &mut self,
        provided: &Option<String>,
        question: &str,
    ) -> VizzardResult<String> {
        match provided {
            Some(s) => Ok(s.trim().to_string()),
            None => self.prompt(question),
        }
    }
}
