use std::time::Duration;

use vn_core::{Level, PresentationConfig, TimerHandle, Timers, Voice, report_playback_failure};

use crate::fade::{AfterFadeOut, Completion, FadePhase};

/// Drives one music channel through quantized fades.
///
/// Holds at most one fade ticker. [`play`](Self::play) always finishes the
/// fade-out (silence, then pause) before the new track's fade-in starts.
#[derive(Debug)]
pub struct FadeController<V> {
    channel: V,
    pending_source: Option<String>,
    initial: Level,
    ceiling: Level,
    interval: Duration,
    phase: FadePhase,
    pending: Option<TimerHandle>,
}

impl<V: Voice> FadeController<V> {
    /// Take ownership of `channel` and set it to the initial volume.
    pub fn new(config: &PresentationConfig, mut channel: V) -> Self {
        let initial = config.initial_level();
        channel.set_volume(initial.volume());
        Self {
            channel,
            pending_source: None,
            initial,
            ceiling: config.ceiling_level(),
            interval: config.fade_interval(),
            phase: FadePhase::Idle,
            pending: None,
        }
    }

    /// Switch to `source`: fade out whatever plays, then fade `source` in.
    pub fn play(&mut self, source: impl Into<String>, timers: &mut dyn Timers) {
        let source = source.into();
        tracing::info!(%source, "music change requested");
        self.pending_source = Some(source);
        self.request_stop(timers, None, true);
    }

    /// Fade out and pause, then run `on_complete`.
    ///
    /// On a paused channel `on_complete` runs before this returns and the
    /// volume is left untouched.
    pub fn stop(&mut self, timers: &mut dyn Timers, on_complete: Option<Completion>) {
        self.request_stop(timers, on_complete, false);
    }

    fn request_stop(
        &mut self,
        timers: &mut dyn Timers,
        on_complete: Option<Completion>,
        fade_in: bool,
    ) {
        if let FadePhase::FadingOut { after, .. } = &mut self.phase {
            after.push(on_complete);
            after.set_fade_in(fade_in);
            tracing::debug!(fade_in, "fade-out already running, continuation updated");
            return;
        }

        self.cancel_pending(timers);
        let mut after = AfterFadeOut::new(fade_in);
        after.push(on_complete);

        if self.channel.is_paused() {
            self.phase = FadePhase::Idle;
            self.finish_fade_out(after, timers);
            return;
        }

        let level = Level::from_volume(self.channel.volume());
        self.phase = FadePhase::FadingOut { level, after };
        self.pending = Some(timers.schedule_every(self.interval));
    }

    /// Start the pending source (if any) from the initial volume and ramp up
    /// to the ceiling.
    ///
    /// A refused start is logged; the ramp runs anyway. A fade-out cut short
    /// here still runs its completion callbacks first.
    pub fn fade_in(&mut self, timers: &mut dyn Timers) {
        self.cancel_pending(timers);
        if let FadePhase::FadingOut { after, .. } = std::mem::take(&mut self.phase) {
            tracing::debug!(
                callbacks = after.pending_callbacks(),
                "fade-out cut short by fade-in"
            );
            after.run();
        }
        if let Some(source) = self.pending_source.take() {
            self.channel.set_source(&source);
        }
        self.channel.set_looping(true);
        self.channel.set_volume(self.initial.volume());
        if let Err(error) = self.channel.play() {
            report_playback_failure("fade in", self.channel.source(), &error);
        }
        self.phase = FadePhase::FadingIn {
            level: self.initial,
        };
        self.pending = Some(timers.schedule_every(self.interval));
    }

    /// Handle a fired timer. Returns `false` for a handle this controller no
    /// longer waits on.
    pub fn on_timer(&mut self, handle: TimerHandle, timers: &mut dyn Timers) -> bool {
        if self.pending != Some(handle) {
            tracing::trace!(%handle, "ignoring stale fade tick");
            return false;
        }

        match std::mem::take(&mut self.phase) {
            FadePhase::FadingIn { level } => {
                let next = level.up().min(self.ceiling);
                self.channel.set_volume(next.volume());
                if next >= self.ceiling {
                    self.cancel_pending(timers);
                    tracing::debug!(volume = %next, "fade-in complete");
                } else {
                    self.phase = FadePhase::FadingIn { level: next };
                }
            }
            FadePhase::FadingOut { level, after } => {
                let next = level.down();
                self.channel.set_volume(next.volume());
                if next.is_silent() {
                    self.cancel_pending(timers);
                    self.channel.pause();
                    tracing::debug!("fade-out complete, channel paused");
                    self.finish_fade_out(after, timers);
                } else {
                    self.phase = FadePhase::FadingOut { level: next, after };
                }
            }
            FadePhase::Idle => self.cancel_pending(timers),
        }
        true
    }

    fn finish_fade_out(&mut self, after: AfterFadeOut, timers: &mut dyn Timers) {
        if after.run() {
            self.fade_in(timers);
        }
    }

    fn cancel_pending(&mut self, timers: &mut dyn Timers) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }
    }

    /// What the channel is doing.
    pub fn phase(&self) -> &FadePhase {
        &self.phase
    }

    /// Whether the channel is playing (fading or steady).
    pub fn is_playing(&self) -> bool {
        !self.channel.is_paused()
    }

    /// The source assigned to the channel.
    pub fn current_source(&self) -> Option<&str> {
        self.channel.source()
    }

    /// The source waiting for the next fade-in.
    pub fn pending_source(&self) -> Option<&str> {
        self.pending_source.as_deref()
    }

    /// The handle of the running fade ticker, if any.
    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// The music channel.
    pub fn channel(&self) -> &V {
        &self.channel
    }

    /// Mutable access to the music channel.
    pub fn channel_mut(&mut self) -> &mut V {
        &mut self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use vn_core::{PlaybackError, TimerQueue};
    use vn_test_support::{Call, CallLog, RecordingVoice};

    struct Harness {
        timers: TimerQueue<()>,
        music: FadeController<RecordingVoice>,
        log: CallLog,
    }

    impl Harness {
        fn new(voice: impl FnOnce(RecordingVoice) -> RecordingVoice) -> Self {
            let log = CallLog::new();
            let channel = voice(RecordingVoice::new(0, log.clone()));
            let music = FadeController::new(&PresentationConfig::default(), channel);
            log.clear();
            Self {
                timers: TimerQueue::new(),
                music,
                log,
            }
        }

        fn stopped() -> Self {
            Self::new(|v| v)
        }

        fn playing(volume: f32) -> Self {
            let mut h = Self::new(|v| v);
            h.music.channel_mut().set_source("old.ogg");
            h.music.channel_mut().set_looping(true);
            h.music.channel_mut().play().unwrap();
            h.music.channel_mut().set_volume(volume);
            h.log.clear();
            h
        }

        fn tick(&mut self) -> bool {
            match self.timers.pop_due(Duration::MAX) {
                Some(fired) => {
                    self.music.on_timer(fired.handle, &mut self.timers);
                    assert!(self.timers.len() <= 1, "more than one fade ticker");
                    true
                }
                None => false,
            }
        }

        fn run(&mut self) -> usize {
            let mut fired = 0;
            while self.tick() {
                fired += 1;
            }
            fired
        }

        /// Volume steps applied so far, in tenths.
        fn steps(&self) -> Vec<u8> {
            self.log
                .volumes(0)
                .into_iter()
                .map(|v| Level::from_volume(v).step())
                .collect()
        }
    }

    fn flag() -> (Rc<Cell<bool>>, Completion) {
        let done = Rc::new(Cell::new(false));
        let set = Rc::clone(&done);
        (done, Box::new(move || set.set(true)))
    }

    #[test]
    fn construction_sets_initial_volume() {
        let log = CallLog::new();
        let music = FadeController::new(
            &PresentationConfig::default(),
            RecordingVoice::new(0, log.clone()),
        );
        assert_eq!(log.volumes(0), vec![0.1]);
        assert!(!music.is_playing());
    }

    #[test]
    fn play_on_stopped_channel_fades_in_at_once() {
        let mut h = Harness::stopped();
        h.music.play("theme.ogg", &mut h.timers);
        assert_eq!(
            h.log.calls(),
            vec![
                Call::SetSource {
                    voice: 0,
                    source: "theme.ogg".into()
                },
                Call::SetLooping {
                    voice: 0,
                    looping: true
                },
                Call::SetVolume {
                    voice: 0,
                    volume: 0.1
                },
                Call::Play {
                    voice: 0,
                    accepted: true
                },
            ]
        );

        assert_eq!(h.run(), 9);
        assert_eq!(h.steps(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert!(!h.music.phase().is_fading());
        assert!(h.music.channel().is_looping());
        assert_eq!(h.timers.now(), Duration::from_millis(180));
    }

    #[test]
    fn stop_on_stopped_channel_completes_synchronously() {
        let mut h = Harness::stopped();
        let (done, callback) = flag();
        h.music.stop(&mut h.timers, Some(callback));
        assert!(done.get());
        assert!(h.log.calls().is_empty());
        assert!(h.timers.is_empty());
    }

    #[test]
    fn stop_fades_to_silence_then_pauses() {
        let mut h = Harness::playing(1.0);
        let (done, callback) = flag();
        h.music.stop(&mut h.timers, Some(callback));
        assert!(!done.get());

        assert_eq!(h.run(), 10);
        assert_eq!(h.steps(), vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(h.log.calls().last(), Some(&Call::Pause { voice: 0 }));
        assert!(done.get());
        assert!(!h.music.is_playing());
    }

    #[test]
    fn play_stops_old_track_before_fading_in() {
        let mut h = Harness::playing(1.0);
        h.music.play("new.ogg", &mut h.timers);
        assert_eq!(h.music.current_source(), Some("old.ogg"));
        assert_eq!(h.music.pending_source(), Some("new.ogg"));
        h.run();

        let calls = h.log.calls();
        let pause = calls.iter().position(|c| *c == Call::Pause { voice: 0 });
        let source = calls
            .iter()
            .position(|c| matches!(c, Call::SetSource { source, .. } if source == "new.ogg"));
        let play = calls.iter().position(|c| matches!(c, Call::Play { .. }));
        assert!(pause < source && source < play, "{calls:?}");
        assert_eq!(
            h.steps(),
            vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
        );
        assert_eq!(h.music.current_source(), Some("new.ogg"));
        assert!(h.music.is_playing());
    }

    #[test]
    fn refused_start_still_ramps() {
        let mut h = Harness::new(|v| v.refusing(PlaybackError::NotAllowed));
        h.music.play("theme.ogg", &mut h.timers);
        assert!(!h.music.is_playing());
        assert_eq!(h.run(), 9);
        assert_eq!(h.steps().last(), Some(&10));
    }

    #[test]
    fn stop_during_refused_fade_in_cancels_the_ramp() {
        let mut h = Harness::new(|v| v.refusing(PlaybackError::NotAllowed));
        h.music.play("theme.ogg", &mut h.timers);
        h.tick();
        let (done, callback) = flag();
        h.music.stop(&mut h.timers, Some(callback));
        assert!(done.get());
        assert!(h.timers.is_empty());
        assert!(!h.music.phase().is_fading());
    }

    #[test]
    fn repeated_play_during_fade_out_keeps_one_ticker() {
        let mut h = Harness::playing(0.5);
        h.music.play("b.ogg", &mut h.timers);
        h.tick();
        h.tick();
        let ticker = h.music.pending();
        h.music.play("c.ogg", &mut h.timers);
        assert_eq!(h.music.pending(), ticker);
        assert_eq!(h.timers.len(), 1);
        h.run();

        let sources: Vec<_> = h
            .log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetSource { source, .. } => Some(source),
                _ => None,
            })
            .collect();
        assert_eq!(sources, vec!["c.ogg".to_string()]);
    }

    #[test]
    fn stop_after_play_cancels_the_pending_fade_in() {
        let mut h = Harness::playing(0.3);
        h.music.play("b.ogg", &mut h.timers);
        let (done, callback) = flag();
        h.music.stop(&mut h.timers, Some(callback));
        h.run();
        assert!(done.get());
        assert!(h.log.plays().is_empty());
        assert!(!h.music.is_playing());
        assert_eq!(h.steps(), vec![2, 1, 0]);
    }

    #[test]
    fn stop_during_fade_in_fades_out_from_current_level() {
        let mut h = Harness::stopped();
        h.music.play("a.ogg", &mut h.timers);
        h.tick();
        h.tick();
        h.tick();
        h.log.clear();
        h.music.stop(&mut h.timers, None);
        assert_eq!(h.timers.len(), 1);
        h.run();
        assert_eq!(h.steps(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn fade_out_starts_from_the_step_below_an_odd_volume() {
        let mut h = Harness::playing(0.29);
        h.music.stop(&mut h.timers, None);
        assert_eq!(h.run(), 2);
        assert_eq!(h.steps(), vec![1, 0]);
    }

    #[test]
    fn every_waiting_callback_runs() {
        let mut h = Harness::playing(0.2);
        let (first, a) = flag();
        let (second, b) = flag();
        h.music.stop(&mut h.timers, Some(a));
        h.music.stop(&mut h.timers, Some(b));
        h.run();
        assert!(first.get() && second.get());
    }

    #[test]
    fn fade_in_during_fade_out_still_runs_callbacks() {
        let mut h = Harness::playing(1.0);
        let (done, callback) = flag();
        h.music.stop(&mut h.timers, Some(callback));
        h.tick();
        h.music.fade_in(&mut h.timers);
        assert!(done.get());
        assert!(matches!(h.music.phase(), FadePhase::FadingIn { .. }));
        assert_eq!(h.timers.len(), 1);

        h.run();
        assert_eq!(h.steps().last(), Some(&10));
        assert!(h.music.is_playing());
    }

    #[test]
    fn stale_tick_is_ignored() {
        let mut h = Harness::playing(1.0);
        h.music.stop(&mut h.timers, None);
        let old = h.music.pending().unwrap();
        h.run();
        assert!(!h.music.on_timer(old, &mut h.timers));
    }
}
