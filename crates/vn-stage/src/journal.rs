use std::time::Duration;

use vn_core::Visibility;

/// What kind of stage event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEventKind {
    // Page
    /// The text region was emptied.
    TextCleared,
    /// One character was revealed.
    CharRevealed(char),
    /// The continue control changed visibility.
    ContinueChanged(Visibility),
    /// The choices changed visibility.
    ChoicesChanged(Visibility),

    // Navigation
    /// A passage was put on the page.
    PassageShown {
        /// The passage name.
        name: String,
    },
    /// The player pressed continue.
    ContinuePressed,
    /// The player picked a choice.
    ChoiceMade {
        /// Index of the picked choice.
        index: usize,
        /// The passage it leads to.
        target: String,
    },

    // Music
    /// A track change was requested.
    MusicRequested {
        /// The requested track.
        source: String,
    },
    /// The music was asked to stop.
    MusicStopRequested,
}

impl StageEventKind {
    /// Whether this event changed what the page shows.
    pub fn is_page_change(&self) -> bool {
        matches!(
            self,
            Self::TextCleared
                | Self::CharRevealed(_)
                | Self::ContinueChanged(_)
                | Self::ChoicesChanged(_)
        )
    }
}

/// A record of something that happened on stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEvent {
    /// Virtual time of the event.
    pub at: Duration,
    /// The specific kind of event.
    pub kind: StageEventKind,
    /// A human-readable description.
    pub description: String,
}

impl StageEvent {
    /// Create an event with the given time, kind, and description.
    pub fn new(at: Duration, kind: StageEventKind, description: impl Into<String>) -> Self {
        Self {
            at,
            kind,
            description: description.into(),
        }
    }
}

/// Bounded record of stage events, oldest dropped first.
#[derive(Debug, Default)]
pub struct Journal {
    events: Vec<StageEvent>,
    max_events: usize,
}

impl Journal {
    /// Create a journal holding at most `max_events` events (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events past capacity.
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Record an event at `at`.
    pub fn record(&mut self, at: Duration, kind: StageEventKind, description: impl Into<String>) {
        self.push(StageEvent::new(at, kind, description));
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    /// Events with `from <= at < to`.
    pub fn events_between(&self, from: Duration, to: Duration) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.at >= from && e.at < to)
            .collect()
    }

    /// Characters revealed since the last time the text was cleared.
    pub fn visible_text(&self) -> String {
        let start = self
            .events
            .iter()
            .rposition(|e| e.kind == StageEventKind::TextCleared)
            .map_or(0, |i| i + 1);
        self.events[start..]
            .iter()
            .filter_map(|e| match e.kind {
                StageEventKind::CharRevealed(ch) => Some(ch),
                _ => None,
            })
            .collect()
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn journal_drops_oldest_past_capacity() {
        let mut journal = Journal::new(3);
        for (i, ch) in "abcde".chars().enumerate() {
            journal.record(ms(i as u64), StageEventKind::CharRevealed(ch), ch.to_string());
        }
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.events()[0].kind, StageEventKind::CharRevealed('c'));
    }

    #[test]
    fn journal_unlimited_by_default() {
        let mut journal = Journal::default();
        for i in 0..100 {
            journal.record(ms(i), StageEventKind::ContinuePressed, "continue");
        }
        assert_eq!(journal.len(), 100);
    }

    #[test]
    fn visible_text_starts_after_last_clear() {
        let mut journal = Journal::new(0);
        for ch in "old".chars() {
            journal.record(ms(0), StageEventKind::CharRevealed(ch), "");
        }
        journal.record(ms(10), StageEventKind::TextCleared, "");
        journal.record(ms(10), StageEventKind::ContinueChanged(Visibility::Hidden), "");
        for ch in "new".chars() {
            journal.record(ms(20), StageEventKind::CharRevealed(ch), "");
        }
        assert_eq!(journal.visible_text(), "new");
    }

    #[test]
    fn events_between_is_half_open() {
        let mut journal = Journal::new(0);
        journal.record(ms(0), StageEventKind::TextCleared, "");
        journal.record(ms(30), StageEventKind::CharRevealed('a'), "");
        journal.record(ms(60), StageEventKind::CharRevealed('b'), "");
        let window = journal.events_between(ms(0), ms(60));
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn page_changes_are_classified() {
        assert!(StageEventKind::TextCleared.is_page_change());
        assert!(!StageEventKind::ContinuePressed.is_page_change());
        assert!(!StageEventKind::MusicStopRequested.is_page_change());
    }
}
