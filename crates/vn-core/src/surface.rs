use crate::timer::Timers;

/// Visibility of a player control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Shown and clickable.
    Visible,
    /// Invisible but still occupying its place in the layout.
    #[default]
    Hidden,
    /// Removed from the layout entirely.
    Collapsed,
}

impl Visibility {
    /// Whether the player can see (and click) the control.
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Hidden => write!(f, "hidden"),
            Self::Collapsed => write!(f, "collapsed"),
        }
    }
}

/// Render boundary the reveal engine writes to.
///
/// The host owns the actual elements. Any of them may be missing; an
/// implementation treats an operation on an absent element as a no-op.
pub trait Surface {
    /// Empty the text region.
    fn clear_text(&mut self);

    /// Append one character to the text region.
    fn append_char(&mut self, ch: char);

    /// Show, hide, or collapse the manual continue control.
    fn set_continue(&mut self, visibility: Visibility);

    /// Show, hide, or collapse every choice control at once.
    fn set_choices(&mut self, visibility: Visibility);
}

/// Mutable context passed to the reveal engine on every call.
pub struct TickContext<'a> {
    /// Where the next tick gets scheduled.
    pub timers: &'a mut dyn Timers,
    /// Where revealed text and control visibility go.
    pub surface: &'a mut dyn Surface,
}

impl<'a> TickContext<'a> {
    /// Bundle a timer capability and a surface.
    pub fn new(timers: &'a mut dyn Timers, surface: &'a mut dyn Surface) -> Self {
        Self { timers, surface }
    }
}

impl std::fmt::Debug for TickContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_visible_is_visible() {
        assert!(Visibility::Visible.is_visible());
        assert!(!Visibility::Hidden.is_visible());
        assert!(!Visibility::Collapsed.is_visible());
    }

    #[test]
    fn default_is_hidden() {
        assert_eq!(Visibility::default(), Visibility::Hidden);
        assert_eq!(Visibility::Collapsed.to_string(), "collapsed");
    }
}
