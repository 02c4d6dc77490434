use std::time::Duration;

/// Tracks virtual time: a monotonic count of fired ticks and the elapsed
/// time since the clock started.
///
/// Time only moves when the owner advances it, which keeps every reveal and
/// fade reproducible regardless of real wall-clock speed.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    ticks: u64,
    elapsed: Duration,
}

impl VirtualClock {
    /// Create a clock at time zero with no ticks fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fired tick at `at`. Returns the new tick count.
    ///
    /// Time never runs backwards: an `at` earlier than the current time
    /// leaves the clock where it is.
    pub fn advance(&mut self, at: Duration) -> u64 {
        self.advance_to(at);
        self.ticks += 1;
        self.ticks
    }

    /// Move time forward to `at` without counting a tick.
    pub fn advance_to(&mut self, at: Duration) {
        if at > self.elapsed {
            self.elapsed = at;
        }
    }

    /// Number of ticks fired so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Elapsed virtual time since the clock started.
    pub fn now(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = VirtualClock::new();
        assert_eq!(clock.ticks(), 0);
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn clock_advance_counts_ticks() {
        let mut clock = VirtualClock::new();
        clock.advance(Duration::from_millis(30));
        clock.advance(Duration::from_millis(60));
        assert_eq!(clock.advance(Duration::from_millis(90)), 3);
        assert_eq!(clock.now(), Duration::from_millis(90));
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = VirtualClock::new();
        clock.advance_to(Duration::from_millis(100));
        clock.advance(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(100));
        assert_eq!(clock.ticks(), 1);
    }
}
