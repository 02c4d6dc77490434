/// Where a reveal sequence stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// The next tick fetches `line` and reveals its first character.
    AwaitingLine {
        /// Index into the queued lines.
        line: usize,
    },
    /// The next tick reveals character `index` of `line`.
    RevealingAt {
        /// Index into the queued lines.
        line: usize,
        /// Index into the line's characters.
        index: usize,
    },
    /// A line is out and more remain; nothing happens until the player
    /// continues.
    HeldBeforeLine {
        /// The line the player continues to.
        next: usize,
    },
    /// Every line is out. A restart begins again at the first line.
    #[default]
    Finished,
}

impl Cursor {
    /// The line a restart resumes at.
    pub fn committed_line(self) -> usize {
        match self {
            Self::AwaitingLine { line } | Self::RevealingAt { line, .. } => line,
            Self::HeldBeforeLine { next } => next,
            Self::Finished => 0,
        }
    }

    /// The cursor a restart begins from: the committed line, from its first
    /// character.
    pub fn rewound(self) -> Self {
        Self::AwaitingLine {
            line: self.committed_line(),
        }
    }

    /// Whether the sequence is waiting for the player to continue.
    pub fn is_held(self) -> bool {
        matches!(self, Self::HeldBeforeLine { .. })
    }

    /// Whether the sequence has finished.
    pub fn is_finished(self) -> bool {
        self == Self::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committed_line_per_state() {
        assert_eq!(Cursor::AwaitingLine { line: 2 }.committed_line(), 2);
        assert_eq!(
            Cursor::RevealingAt { line: 1, index: 7 }.committed_line(),
            1
        );
        assert_eq!(Cursor::HeldBeforeLine { next: 3 }.committed_line(), 3);
        assert_eq!(Cursor::Finished.committed_line(), 0);
    }

    #[test]
    fn rewinding_drops_the_character_index() {
        assert_eq!(
            Cursor::RevealingAt { line: 1, index: 7 }.rewound(),
            Cursor::AwaitingLine { line: 1 }
        );
        assert_eq!(
            Cursor::HeldBeforeLine { next: 2 }.rewound(),
            Cursor::AwaitingLine { line: 2 }
        );
        assert_eq!(Cursor::Finished.rewound(), Cursor::AwaitingLine { line: 0 });
    }

    #[test]
    fn state_predicates() {
        assert!(Cursor::HeldBeforeLine { next: 1 }.is_held());
        assert!(!Cursor::Finished.is_held());
        assert!(Cursor::default().is_finished());
    }
}
