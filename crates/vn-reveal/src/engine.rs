use std::time::Duration;

use vn_core::{PresentationConfig, TickContext, TimerHandle, Visibility, Voice};

use crate::cursor::Cursor;
use crate::pool::{SoundPool, is_cue_position};
use crate::session::{RevealSession, Step};

/// Reveals queued lines one character per tick.
///
/// The engine owns its session, its cue pool, and the handle of its single
/// pending tick. Every entry point that starts a new tick sequence cancels
/// that handle first, and [`on_timer`](Self::on_timer) ignores any handle
/// that is not the current one, so two sequences can never interleave.
#[derive(Debug)]
pub struct RevealEngine<V> {
    session: RevealSession,
    pool: SoundPool<V>,
    interval: Duration,
    pending: Option<TimerHandle>,
}

impl<V: Voice> RevealEngine<V> {
    /// Create an engine with the configured interval and cue sample, using
    /// `voices` as the cue pool.
    pub fn new(config: &PresentationConfig, voices: Vec<V>) -> Self {
        Self::from_parts(
            SoundPool::new(voices, config.cue_source.clone()),
            config.char_interval(),
        )
    }

    /// Create an engine from an existing pool and interval.
    pub fn from_parts(pool: SoundPool<V>, interval: Duration) -> Self {
        Self {
            session: RevealSession::default(),
            pool,
            interval,
            pending: None,
        }
    }

    /// Replace the queued lines and start revealing them.
    ///
    /// The first character appears before this returns. An empty queue
    /// finishes immediately.
    pub fn write<I, S>(&mut self, lines: I, ctx: &mut TickContext<'_>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cancel_pending(ctx);
        self.session = RevealSession::new(lines.into_iter().map(Into::into).collect());
        tracing::debug!(
            lines = self.session.lines().len(),
            chars = self.session.total_chars(),
            "reveal sequence started"
        );
        self.advance(ctx);
    }

    /// Clear the text, hide the continue control, and reveal the queued
    /// lines again from the committed line.
    ///
    /// Called when the player continues past a held line. A line that was
    /// interrupted restarts from its first character; a finished sequence
    /// replays from the first line.
    pub fn clear_and_write(&mut self, ctx: &mut TickContext<'_>) {
        self.cancel_pending(ctx);
        ctx.surface.clear_text();
        ctx.surface.set_continue(Visibility::Hidden);
        self.session.rewind();
        self.advance(ctx);
    }

    /// Handle a fired timer. Returns `false` for a handle this engine no
    /// longer waits on.
    pub fn on_timer(&mut self, handle: TimerHandle, ctx: &mut TickContext<'_>) -> bool {
        if self.pending != Some(handle) {
            tracing::trace!(%handle, "ignoring stale reveal tick");
            return false;
        }
        self.pending = None;
        self.advance(ctx);
        true
    }

    fn advance(&mut self, ctx: &mut TickContext<'_>) {
        match self.session.step() {
            Step::Reveal { index, ch } => {
                ctx.surface.append_char(ch);
                if is_cue_position(index, ch) {
                    self.pool.cue(index);
                }
                self.pending = Some(ctx.timers.schedule(self.interval));
            }
            Step::Hold { next } => {
                self.cancel_pending(ctx);
                ctx.surface.set_continue(Visibility::Visible);
                tracing::debug!(next_line = next, "line revealed, waiting for continue");
            }
            Step::Finish => {
                self.cancel_pending(ctx);
                ctx.surface.set_choices(Visibility::Visible);
                ctx.surface.set_continue(Visibility::Collapsed);
                tracing::info!(
                    lines = self.session.lines().len(),
                    "reveal sequence finished"
                );
            }
            Step::Idle => tracing::trace!(cursor = ?self.session.cursor(), "nothing to reveal"),
        }
    }

    fn cancel_pending(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(handle) = self.pending.take() {
            ctx.timers.cancel(handle);
        }
    }

    /// The current session.
    pub fn session(&self) -> &RevealSession {
        &self.session
    }

    /// Where the sequence stands.
    pub fn cursor(&self) -> Cursor {
        self.session.cursor()
    }

    /// Whether the engine waits for the player to continue.
    pub fn is_held(&self) -> bool {
        self.cursor().is_held()
    }

    /// Whether the whole sequence is out.
    pub fn is_finished(&self) -> bool {
        self.cursor().is_finished()
    }

    /// The handle of the pending tick, if any.
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Interval between two characters.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The cue pool.
    pub fn pool(&self) -> &SoundPool<V> {
        &self.pool
    }
}
