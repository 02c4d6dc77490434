use vn_core::Level;

/// Callback run once a fade-out has paused the channel.
pub type Completion = Box<dyn FnOnce()>;

/// What happens once a fade-out reaches silence.
///
/// Requests arriving while a fade-out runs are merged here: every completion
/// callback is kept, and the latest request decides whether a fade-in
/// follows.
#[derive(Default)]
pub struct AfterFadeOut {
    notify: Vec<Completion>,
    fade_in: bool,
}

impl AfterFadeOut {
    /// A continuation that fades in afterwards if `fade_in` is set.
    pub fn new(fade_in: bool) -> Self {
        Self {
            notify: Vec::new(),
            fade_in,
        }
    }

    /// Add a completion callback, if there is one.
    pub fn push(&mut self, on_complete: Option<Completion>) {
        if let Some(callback) = on_complete {
            self.notify.push(callback);
        }
    }

    /// Decide whether a fade-in follows.
    pub fn set_fade_in(&mut self, fade_in: bool) {
        self.fade_in = fade_in;
    }

    /// Whether a fade-in follows.
    pub fn fades_in(&self) -> bool {
        self.fade_in
    }

    /// Number of callbacks waiting.
    pub fn pending_callbacks(&self) -> usize {
        self.notify.len()
    }

    /// Run every callback in the order they were added. Returns whether a
    /// fade-in follows.
    pub fn run(self) -> bool {
        for callback in self.notify {
            callback();
        }
        self.fade_in
    }
}

impl std::fmt::Debug for AfterFadeOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfterFadeOut")
            .field("callbacks", &self.notify.len())
            .field("fade_in", &self.fade_in)
            .finish()
    }
}

/// What the music channel is doing.
#[derive(Debug, Default)]
pub enum FadePhase {
    /// No fade running. The channel is either paused or playing steadily.
    #[default]
    Idle,
    /// Volume rising one step per tick.
    FadingIn {
        /// The level last applied.
        level: Level,
    },
    /// Volume falling one step per tick; pauses at silence.
    FadingOut {
        /// The level last applied.
        level: Level,
        /// What happens at silence.
        after: AfterFadeOut,
    },
}

impl FadePhase {
    /// Whether a fade ticker is running.
    pub fn is_fading(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn callbacks_run_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut after = AfterFadeOut::new(false);
        for i in 0..3 {
            let seen = Rc::clone(&seen);
            after.push(Some(Box::new(move || seen.borrow_mut().push(i))));
        }
        after.push(None);
        assert_eq!(after.pending_callbacks(), 3);
        assert!(!after.run());
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn latest_request_decides_fade_in() {
        let mut after = AfterFadeOut::new(true);
        after.set_fade_in(false);
        assert!(!after.fades_in());
        assert_eq!(format!("{after:?}"), "AfterFadeOut { callbacks: 0, fade_in: false }");
    }

    #[test]
    fn idle_is_not_fading() {
        assert!(!FadePhase::Idle.is_fading());
        assert!(FadePhase::FadingIn { level: Level::new(3) }.is_fading());
    }
}
