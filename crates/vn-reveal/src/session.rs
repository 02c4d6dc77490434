//! Line queue and cursor transitions of one reveal sequence.
//!
//! The session is pure state: it decides what a tick does and leaves the
//! rendering, cues, and timers to the engine.

use crate::cursor::Cursor;

/// What one tick of the reveal produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Reveal `ch`, found at `index` of the current line.
    Reveal {
        /// Character index within the line.
        index: usize,
        /// The character to append.
        ch: char,
    },
    /// The current line is exhausted and line `next` is queued.
    Hold {
        /// The line the player continues to.
        next: usize,
    },
    /// The last line is exhausted (or there were no lines).
    Finish,
    /// Nothing to do: the sequence is held or finished.
    Idle,
}

/// The lines queued by one `write` and the cursor walking through them.
#[derive(Debug, Clone, Default)]
pub struct RevealSession {
    lines: Vec<String>,
    current: Option<Vec<char>>,
    cursor: Cursor,
}

impl RevealSession {
    /// A session positioned before the first character of the first line.
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            current: None,
            cursor: Cursor::AwaitingLine { line: 0 },
        }
    }

    /// The queued lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Where the sequence stands.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Characters of the line being revealed; `None` between lines.
    pub fn current_text(&self) -> Option<&[char]> {
        self.current.as_deref()
    }

    /// Total characters across all queued lines.
    pub fn total_chars(&self) -> usize {
        self.lines.iter().map(|line| line.chars().count()).sum()
    }

    /// Run one tick's worth of cursor movement.
    pub fn step(&mut self) -> Step {
        let (line, index) = match self.cursor {
            Cursor::AwaitingLine { line } => match self.lines.get(line) {
                Some(text) => {
                    self.current = Some(text.chars().collect());
                    (line, 0)
                }
                None => return self.finish(),
            },
            Cursor::RevealingAt { line, index } => (line, index),
            Cursor::HeldBeforeLine { .. } | Cursor::Finished => return Step::Idle,
        };

        let ch = self
            .current
            .as_ref()
            .and_then(|chars| chars.get(index).copied());
        match ch {
            Some(ch) => {
                self.cursor = Cursor::RevealingAt {
                    line,
                    index: index + 1,
                };
                Step::Reveal { index, ch }
            }
            None => {
                self.current = None;
                let next = line + 1;
                if next >= self.lines.len() {
                    self.finish()
                } else {
                    self.cursor = Cursor::HeldBeforeLine { next };
                    Step::Hold { next }
                }
            }
        }
    }

    /// Go back to the first character of the committed line.
    pub fn rewind(&mut self) {
        self.current = None;
        self.cursor = self.cursor.rewound();
    }

    fn finish(&mut self) -> Step {
        self.current = None;
        self.cursor = Cursor::Finished;
        Step::Finish
    }
}
