//! The contract every field widget honours against the shared store
//!
//! Whatever component model a widget is built on, it reads its value and
//! error from the store, writes changes through [`FieldBinding::change`] and
//! re-validates on blur through [`FieldBinding::blur`]. Focus and other
//! transient UI state stay inside the widget.

use crate::state::{error_message, FieldId, Store};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

/// A widget's connection to one store field
#[derive(Debug, Clone)]
pub struct FieldBinding {
    store: Store,
    field: FieldId,
}

impl FieldBinding {
    pub fn new(store: Store, field: FieldId) -> Self {
        Self { store, field }
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    pub fn value(&self) -> String {
        self.store.value(self.field)
    }

    pub fn error(&self) -> String {
        self.store.error(self.field)
    }

    /// Write a new value, then validate it and write the result
    pub fn change(&self, value: impl Into<String>) {
        let value = value.into();
        let error = error_message(self.field, &value);
        self.store.set_field(self.field, value);
        self.store.set_field_error(self.field, error);
    }

    /// Re-validate whatever value is currently stored
    pub fn blur(&self) {
        let error = error_message(self.field, &self.value());
        self.store.set_field_error(self.field, error);
    }
}

/// A field widget drawn by the host on every frame
pub trait FieldWidget {
    fn binding(&self) -> &FieldBinding;

    fn is_focused(&self) -> bool;

    fn set_focused(&mut self, focused: bool);

    /// Rows the widget needs, including its error line
    fn height(&self) -> u16;

    fn render(&self, frame: &mut Frame, area: Rect);

    fn field(&self) -> FieldId {
        self.binding().field()
    }

    fn focus(&mut self) {
        self.set_focused(true);
    }

    fn blur(&mut self) {
        self.set_focused(false);
        self.binding().blur();
    }

    /// Accepts `\n` only in multi-line widgets
    fn accepts_newline(&self) -> bool {
        false
    }

    /// Apply a key press. Returns true if the key was consumed.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);
        match key.code {
            KeyCode::Char(c) if !ctrl => {
                let mut value = self.binding().value();
                value.push(c);
                self.binding().change(value);
                true
            }
            KeyCode::Enter if self.accepts_newline() => {
                let mut value = self.binding().value();
                value.push('\n');
                self.binding().change(value);
                true
            }
            KeyCode::Backspace => {
                let mut value = self.binding().value();
                if value.pop().is_some() {
                    self.binding().change(value);
                }
                true
            }
            _ => false,
        }
    }
}
