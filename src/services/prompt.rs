use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Only this exact answer lets a destructive step go ahead.
pub const AFFIRMATIVE: &str = "SIM";

pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

pub fn is_affirmative(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']) == AFFIRMATIVE
}

/// Prints `prompt` without a newline and reads one line from stdin.
pub fn read_line(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Interactive confirmation on the terminal.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let full = format!("{}\n   Type '{}' to confirm: ", prompt, AFFIRMATIVE);
        match read_line(&full) {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation");
                false
            }
        }
    }
}

/// Replays canned answers and records every prompt it was shown.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.prompts.len()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|answer| is_affirmative(&answer))
            .unwrap_or(false)
    }
}
