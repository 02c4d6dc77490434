//! In-memory [`Surface`] that records every call.

use vn_core::{Surface, Visibility};

use crate::log::{Call, CallLog};

/// A surface that keeps the current text and control state and records
/// every call into a [`CallLog`].
///
/// Controls can be left out to exercise missing render targets; calls on an
/// absent control are not recorded.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    text: String,
    continue_control: Option<Visibility>,
    choices: Option<Visibility>,
    log: CallLog,
}

impl RecordingSurface {
    /// A surface with a hidden continue control and hidden choices.
    pub fn new(log: CallLog) -> Self {
        Self {
            text: String::new(),
            continue_control: Some(Visibility::Hidden),
            choices: Some(Visibility::Hidden),
            log,
        }
    }

    /// A surface with no continue control and no choices at all.
    pub fn without_controls(log: CallLog) -> Self {
        Self {
            continue_control: None,
            choices: None,
            ..Self::new(log)
        }
    }

    /// The text region's content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The continue control's visibility, if the control exists.
    pub fn continue_control(&self) -> Option<Visibility> {
        self.continue_control
    }

    /// The choices' visibility, if any choice exists.
    pub fn choices(&self) -> Option<Visibility> {
        self.choices
    }
}

impl Surface for RecordingSurface {
    fn clear_text(&mut self) {
        self.text.clear();
        self.log.push(Call::ClearText);
    }

    fn append_char(&mut self, ch: char) {
        self.text.push(ch);
        self.log.push(Call::AppendChar(ch));
    }

    fn set_continue(&mut self, visibility: Visibility) {
        if let Some(control) = self.continue_control.as_mut() {
            *control = visibility;
            self.log.push(Call::SetContinue(visibility));
        }
    }

    fn set_choices(&mut self, visibility: Visibility) {
        if let Some(choices) = self.choices.as_mut() {
            *choices = visibility;
            self.log.push(Call::SetChoices(visibility));
        }
    }
}
