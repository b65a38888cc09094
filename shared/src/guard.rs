//! Route-leave guard for views holding unsaved edits.

use tracing::debug;

use crate::capabilities::Confirm;

pub const UNSAVED_CHANGES_PROMPT: &str =
    "Are you sure you want to continue? Any unsaved changes will be lost";

/// A view that knows whether its form has been edited since it was loaded.
pub trait DirtyTracking {
    fn is_dirty(&self) -> bool;
}

/// Edit-form state as far as the guard cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditForm {
    dirty: bool,
}

impl EditForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called after a successful save or a reload.
    pub fn mark_pristine(&mut self) {
        self.dirty = false;
    }
}

impl DirtyTracking for EditForm {
    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Outcome of asking to leave a guarded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    /// Nothing to lose; go ahead now.
    Allowed,
    /// The user was asked; the answer arrives as an event.
    AwaitingConfirmation,
}

/// Lets navigation proceed unless the view is dirty and the user backs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreventUnsavedChanges {
    prompt: String,
}

impl Default for PreventUnsavedChanges {
    fn default() -> Self {
        Self {
            prompt: UNSAVED_CHANGES_PROMPT.to_string(),
        }
    }
}

impl PreventUnsavedChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// The question to put to the user, or `None` when leaving loses nothing.
    /// Reads the flag as it is right now.
    pub fn prompt_for<V: DirtyTracking + ?Sized>(&self, view: &V) -> Option<&str> {
        view.is_dirty().then_some(self.prompt.as_str())
    }

    /// Decides whether `view` may be left. A dirty view asks through
    /// `confirm`, and `on_answer` receives `true` when the user goes ahead.
    pub fn can_deactivate<V, Ev, F>(&self, view: &V, confirm: &Confirm<Ev>, on_answer: F) -> Deactivation
    where
        V: DirtyTracking + ?Sized,
        Ev: Send + 'static,
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        match self.prompt_for(view) {
            None => Deactivation::Allowed,
            Some(prompt) => {
                debug!("unsaved changes, asking before leaving");
                confirm.ask(prompt, on_answer);
                Deactivation::AwaitingConfirmation
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_form_needs_no_prompt() {
        let guard = PreventUnsavedChanges::new();
        assert_eq!(guard.prompt_for(&EditForm::new()), None);
    }

    #[test]
    fn test_dirty_form_is_prompted() {
        let guard = PreventUnsavedChanges::new();
        let mut form = EditForm::new();
        form.mark_dirty();

        assert_eq!(guard.prompt_for(&form), Some(UNSAVED_CHANGES_PROMPT));
    }

    #[test]
    fn test_flag_is_read_at_navigation_time() {
        let guard = PreventUnsavedChanges::new();
        let mut form = EditForm::new();
        form.mark_dirty();
        form.mark_pristine();

        assert_eq!(guard.prompt_for(&form), None);
    }
}
