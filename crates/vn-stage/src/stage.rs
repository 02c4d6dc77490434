use std::time::Duration;

use vn_core::{ConfigError, Fired, PresentationConfig, Surface, TickContext, TimerQueue, Visibility, Voice};
use vn_music::{Completion, FadeController, FadePhase};
use vn_reveal::RevealEngine;

use crate::error::{StageError, StageResult};
use crate::journal::{Journal, StageEventKind};
use crate::page::{JournalingSurface, Page};
use crate::script::{MusicCue, Passage, Script};

/// Which component a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The typewriter reveal.
    Reveal,
    /// The music fades.
    Music,
}

/// Plays a [`Script`]: owns the reveal engine, the music controller, the
/// page, and the one timer queue they share.
///
/// Time only moves through [`run_until`](Self::run_until),
/// [`run_for`](Self::run_for) and [`step`](Self::step); fired timers are
/// dispatched to their owner in deadline order.
pub struct Stage<C, M> {
    script: Script,
    config: PresentationConfig,
    timers: TimerQueue<Owner>,
    reveal: RevealEngine<C>,
    music: FadeController<M>,
    page: Page,
    journal: Journal,
    passage: Option<String>,
}

impl<C, M> std::fmt::Debug for Stage<C, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("passage", &self.passage)
            .field("now", &self.timers.now())
            .field("timers", &self.timers.len())
            .field("events", &self.journal.len())
            .finish()
    }
}

impl<C: Voice, M: Voice> Stage<C, M> {
    /// Build a stage. `cues` become the cue pool, `channel` the music channel.
    ///
    /// There must be exactly `config.cue_pool_size` cue voices.
    pub fn new(
        script: Script,
        config: PresentationConfig,
        cues: Vec<C>,
        channel: M,
    ) -> StageResult<Self> {
        config.validate()?;
        if cues.len() != config.cue_pool_size {
            return Err(ConfigError::Invalid(format!(
                "cue_pool_size is {} but {} cue voices were given",
                config.cue_pool_size,
                cues.len()
            ))
            .into());
        }
        script.validate()?;
        Ok(Self {
            reveal: RevealEngine::new(&config, cues),
            music: FadeController::new(&config, channel),
            journal: Journal::new(config.journal_capacity),
            timers: TimerQueue::new(),
            page: Page::new(),
            passage: None,
            script,
            config,
        })
    }

    /// Use `page` instead of the default page.
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    /// Show the script's start passage.
    pub fn start(&mut self) -> StageResult<()> {
        let start = self.script.start.clone();
        self.show(&start)
    }

    /// Put passage `name` on the page: reset the page, switch music if the
    /// passage asks for a different track, and start revealing its lines.
    pub fn show(&mut self, name: &str) -> StageResult<()> {
        let passage: Passage = self
            .script
            .passage(name)
            .cloned()
            .ok_or_else(|| StageError::UnknownPassage(name.to_string()))?;

        let now = self.now();
        tracing::info!(passage = name, lines = passage.lines.len(), "showing passage");
        self.journal.record(
            now,
            StageEventKind::PassageShown {
                name: name.to_string(),
            },
            format!("passage '{name}'"),
        );
        self.passage = Some(name.to_string());

        self.page
            .install_choices(passage.choices.iter().map(|c| c.label.clone()).collect());
        {
            let mut surface = JournalingSurface::new(&mut self.page, &mut self.journal, now);
            surface.clear_text();
            surface.set_continue(Visibility::Hidden);
        }

        match passage.music {
            None => {}
            Some(MusicCue::Toggle(false)) => self.stop_music(None),
            Some(MusicCue::Toggle(true)) => {
                let track = self.config.music_source.clone();
                self.switch_music(&track);
            }
            Some(MusicCue::Track(track)) => self.switch_music(&track),
        }

        self.write(passage.lines);
        Ok(())
    }

    /// Reveal `lines` on the current page.
    pub fn write<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_reveal(|reveal, ctx| reveal.write(lines, ctx));
    }

    /// Continue past a held line. Does nothing unless the continue control
    /// is visible.
    pub fn press_continue(&mut self) -> bool {
        if !self.page.can_continue() {
            tracing::trace!("continue pressed while the control is not shown");
            return false;
        }
        self.journal
            .record(self.now(), StageEventKind::ContinuePressed, "continue");
        self.with_reveal(|reveal, ctx| reveal.clear_and_write(ctx));
        true
    }

    /// Pick choice `index` and show its target. Returns `Ok(false)` while
    /// the choices are not shown.
    pub fn choose(&mut self, index: usize) -> StageResult<bool> {
        if !self.page.can_choose() {
            tracing::trace!(index, "choice picked while choices are not shown");
            return Ok(false);
        }
        let choices = self
            .current_passage()
            .map(|p| p.choices.as_slice())
            .unwrap_or_default();
        let target = choices
            .get(index)
            .map(|c| c.target.clone())
            .ok_or(StageError::InvalidChoice {
                index,
                available: choices.len(),
            })?;

        self.journal.record(
            self.now(),
            StageEventKind::ChoiceMade {
                index,
                target: target.clone(),
            },
            format!("choice {index} -> '{target}'"),
        );
        self.show(&target)?;
        Ok(true)
    }

    /// Fade to `source`.
    pub fn play_music(&mut self, source: &str) {
        self.journal.record(
            self.now(),
            StageEventKind::MusicRequested {
                source: source.to_string(),
            },
            format!("music '{source}'"),
        );
        self.music
            .play(source, &mut self.timers.lane(Owner::Music));
    }

    /// Fade the music out, then run `on_complete`.
    pub fn stop_music(&mut self, on_complete: Option<Completion>) {
        self.journal
            .record(self.now(), StageEventKind::MusicStopRequested, "music stop");
        self.music
            .stop(&mut self.timers.lane(Owner::Music), on_complete);
    }

    fn switch_music(&mut self, track: &str) {
        if self.is_on_track(track) {
            tracing::debug!(track, "music already on this track");
            return;
        }
        self.play_music(track);
    }

    /// Whether `track` is playing or about to be faded in.
    fn is_on_track(&self, track: &str) -> bool {
        match self.music.phase() {
            FadePhase::FadingOut { after, .. } => {
                after.fades_in() && self.music.pending_source() == Some(track)
            }
            _ => self.music.is_playing() && self.music.current_source() == Some(track),
        }
    }

    /// Fire every timer due at or before `until`, then move the clock to
    /// `until`. Returns how many timers fired.
    pub fn run_until(&mut self, until: Duration) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(until) {
            self.dispatch(timer);
            fired += 1;
        }
        self.timers.advance_to(until);
        fired
    }

    /// [`run_until`](Self::run_until) `d` from now.
    pub fn run_for(&mut self, d: Duration) -> usize {
        let until = self.now() + d;
        self.run_until(until)
    }

    /// Fire the next pending timer, however far away it is.
    pub fn step(&mut self) -> Option<Fired<Owner>> {
        let deadline = self.timers.next_deadline()?;
        let timer = self.timers.pop_due(deadline)?;
        self.dispatch(timer);
        Some(timer)
    }

    fn dispatch(&mut self, timer: Fired<Owner>) {
        match timer.key {
            Owner::Reveal => {
                self.with_reveal(|reveal, ctx| reveal.on_timer(timer.handle, ctx));
            }
            Owner::Music => {
                self.music
                    .on_timer(timer.handle, &mut self.timers.lane(Owner::Music));
            }
        }
    }

    fn with_reveal<R>(
        &mut self,
        f: impl FnOnce(&mut RevealEngine<C>, &mut TickContext<'_>) -> R,
    ) -> R {
        let now = self.timers.now();
        let mut lane = self.timers.lane(Owner::Reveal);
        let mut surface = JournalingSurface::new(&mut self.page, &mut self.journal, now);
        let mut ctx = TickContext::new(&mut lane, &mut surface);
        f(&mut self.reveal, &mut ctx)
    }

    /// Deadline of the next pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Return `true` if no timer is pending.
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// The passage on the page.
    pub fn current_passage(&self) -> Option<&Passage> {
        self.passage.as_deref().and_then(|name| self.script.passage(name))
    }

    /// Name of the passage on the page.
    pub fn current_passage_name(&self) -> Option<&str> {
        self.passage.as_deref()
    }

    /// The page as the player sees it.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Everything that happened on stage so far.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// The script being played.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// The presentation configuration.
    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    /// The reveal engine.
    pub fn reveal(&self) -> &RevealEngine<C> {
        &self.reveal
    }

    /// The music controller.
    pub fn music(&self) -> &FadeController<M> {
        &self.music
    }

    /// Mutable access to the music controller.
    pub fn music_mut(&mut self) -> &mut FadeController<M> {
        &mut self.music
    }
}
