use std::time::Duration;

use vn_core::{Surface, Visibility};

use crate::journal::{Journal, StageEventKind};

/// Headless page: the text region, the continue control, and the choices.
///
/// The continue control can be left out, and a passage may offer no choices;
/// operations on a missing element change nothing.
#[derive(Debug, Clone)]
pub struct Page {
    text: String,
    continue_control: Option<Visibility>,
    choices: Vec<String>,
    choices_visibility: Visibility,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// An empty page with a hidden continue control and no choices.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            continue_control: Some(Visibility::Hidden),
            choices: Vec::new(),
            choices_visibility: Visibility::Hidden,
        }
    }

    /// An empty page without a continue control.
    pub fn without_continue() -> Self {
        Self {
            continue_control: None,
            ..Self::new()
        }
    }

    /// Install the labels of the passage's choices, hidden.
    pub fn install_choices(&mut self, labels: Vec<String>) {
        self.choices = labels;
        self.choices_visibility = Visibility::Hidden;
    }

    /// The text region's content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The continue control's visibility, if the control exists.
    pub fn continue_control(&self) -> Option<Visibility> {
        self.continue_control
    }

    /// Whether the player can press continue right now.
    pub fn can_continue(&self) -> bool {
        self.continue_control.is_some_and(Visibility::is_visible)
    }

    /// Choice labels, in order.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// The choices' visibility, if any choice exists.
    pub fn choices_visibility(&self) -> Option<Visibility> {
        (!self.choices.is_empty()).then_some(self.choices_visibility)
    }

    /// Whether the player can pick a choice right now.
    pub fn can_choose(&self) -> bool {
        self.choices_visibility().is_some_and(Visibility::is_visible)
    }

    fn apply_continue(&mut self, visibility: Visibility) -> bool {
        match self.continue_control.as_mut() {
            Some(control) => {
                *control = visibility;
                true
            }
            None => false,
        }
    }

    fn apply_choices(&mut self, visibility: Visibility) -> bool {
        if self.choices.is_empty() {
            return false;
        }
        self.choices_visibility = visibility;
        true
    }
}

impl Surface for Page {
    fn clear_text(&mut self) {
        self.text.clear();
    }

    fn append_char(&mut self, ch: char) {
        self.text.push(ch);
    }

    fn set_continue(&mut self, visibility: Visibility) {
        self.apply_continue(visibility);
    }

    fn set_choices(&mut self, visibility: Visibility) {
        self.apply_choices(visibility);
    }
}

/// A [`Surface`] that updates a [`Page`] and journals every change it makes.
#[derive(Debug)]
pub struct JournalingSurface<'a> {
    page: &'a mut Page,
    journal: &'a mut Journal,
    at: Duration,
}

impl<'a> JournalingSurface<'a> {
    /// Journal changes to `page` as happening at `at`.
    pub fn new(page: &'a mut Page, journal: &'a mut Journal, at: Duration) -> Self {
        Self { page, journal, at }
    }
}

impl Surface for JournalingSurface<'_> {
    fn clear_text(&mut self) {
        self.page.clear_text();
        self.journal
            .record(self.at, StageEventKind::TextCleared, "text cleared");
    }

    fn append_char(&mut self, ch: char) {
        self.page.append_char(ch);
        self.journal.record(
            self.at,
            StageEventKind::CharRevealed(ch),
            format!("revealed {ch:?}"),
        );
    }

    fn set_continue(&mut self, visibility: Visibility) {
        if self.page.apply_continue(visibility) {
            self.journal.record(
                self.at,
                StageEventKind::ContinueChanged(visibility),
                format!("continue {visibility}"),
            );
        } else {
            tracing::trace!(%visibility, "no continue control on the page");
        }
    }

    fn set_choices(&mut self, visibility: Visibility) {
        if self.page.apply_choices(visibility) {
            self.journal.record(
                self.at,
                StageEventKind::ChoicesChanged(visibility),
                format!("choices {visibility}"),
            );
        } else {
            tracing::trace!(%visibility, "no choices on the page");
        }
    }
}
