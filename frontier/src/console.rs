//! In-game debug console.
//!
//! The console keeps an ordered transcript of prompt, echo and result lines.
//! Lines start with [`PROMPT_MARKER`]; `clear`/`cls` reset the transcript and
//! everything else is handed to an [`Evaluator`].

use crate::commands::CommandError;

/// Marker every console line starts with.
pub const PROMPT_MARKER: &str = ">";

/// Kind of a transcript line, which decides how it is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Empty line awaiting input.
    Prompt,
    /// A submitted line, as typed.
    Echo,
    /// Output of a successful evaluation.
    Result,
    /// Human-readable evaluation failure.
    Error,
}

/// One line of the console transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub kind: EntryKind,
    pub text: String,
}

impl ConsoleEntry {
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn prompt() -> Self {
        Self::new(EntryKind::Prompt, "")
    }
}

/// Something that can run a console line and describe the result.
pub trait Evaluator {
    fn evaluate(&mut self, input: &str) -> Result<String, CommandError>;
}

/// Transcript plus the line currently being typed.
#[derive(Clone, Debug)]
pub struct ConsoleSession {
    transcript: Vec<ConsoleEntry>,
    input: String,
    active: bool,
    history_limit: Option<usize>,
}

impl ConsoleSession {
    /// An inactive console with an empty transcript.
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            input: PROMPT_MARKER.to_string(),
            active: false,
            history_limit: None,
        }
    }

    /// Keep at most `limit` transcript entries, dropping the oldest first.
    #[must_use]
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit.map(|l| l.max(1));
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn transcript(&self) -> &[ConsoleEntry] {
        &self.transcript
    }

    /// The line being typed, including the prompt marker.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Show or hide the console. The first activation seeds a prompt line.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        if self.active && self.transcript.is_empty() {
            self.transcript.push(ConsoleEntry::prompt());
        }
        self.active
    }

    /// Append typed text to the input line. Control characters are dropped.
    pub fn push_text(&mut self, text: &str) {
        self.input.extend(text.chars().filter(|c| !c.is_control()));
    }

    /// Remove the last typed character, never the prompt marker.
    pub fn backspace(&mut self) {
        if self.input.len() > PROMPT_MARKER.len() {
            self.input.pop();
        }
    }

    /// Submit the typed line and reset the input to a bare prompt.
    pub fn submit_input(&mut self, evaluator: &mut dyn Evaluator) -> &[ConsoleEntry] {
        let raw = std::mem::replace(&mut self.input, PROMPT_MARKER.to_string());
        self.submit(&raw, evaluator)
    }

    /// Run one console line.
    ///
    /// `clear`/`cls` leave exactly one empty prompt. Any other line appends an
    /// echo of `raw`, the evaluation result or error, and a fresh prompt.
    pub fn submit(&mut self, raw: &str, evaluator: &mut dyn Evaluator) -> &[ConsoleEntry] {
        let remainder = raw.strip_prefix(PROMPT_MARKER).unwrap_or(raw).trim();

        if matches!(remainder, "clear" | "cls") {
            self.transcript.clear();
            self.transcript.push(ConsoleEntry::prompt());
            log::debug!("console cleared");
            return &self.transcript;
        }

        let outcome = match evaluator.evaluate(remainder) {
            Ok(output) => ConsoleEntry::new(EntryKind::Result, output),
            Err(err) => ConsoleEntry::new(EntryKind::Error, err.to_string()),
        };
        log::debug!("console `{remainder}` -> {:?}: {}", outcome.kind, outcome.text);

        self.transcript.push(ConsoleEntry::new(EntryKind::Echo, raw));
        self.transcript.push(outcome);
        self.transcript.push(ConsoleEntry::prompt());
        self.enforce_limit();

        &self.transcript
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.history_limit {
            if self.transcript.len() > limit {
                let excess = self.transcript.len() - limit;
                self.transcript.drain(..excess);
            }
        }
    }
}

impl Default for ConsoleSession {
    fn default() -> Self {
        Self::new()
    }
}
