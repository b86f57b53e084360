//! Single-line host widgets (name and email)

use super::binding::{FieldBinding, FieldWidget};
use super::field_renderer::{draw_field, FieldView};
use crate::state::{FieldId, Store};
use ratatui::{layout::Rect, style::Color, Frame};

/// One-line text input bound to a store field
#[derive(Debug, Clone)]
pub struct TextInput {
    binding: FieldBinding,
    placeholder: &'static str,
    accent: Color,
    focused: bool,
}

impl TextInput {
    pub fn new(store: Store, field: FieldId, placeholder: &'static str, accent: Color) -> Self {
        Self {
            binding: FieldBinding::new(store, field),
            placeholder,
            accent,
            focused: false,
        }
    }

    /// The full-name input
    pub fn name(store: Store) -> Self {
        Self::new(store, FieldId::Name, "Enter your full name", Color::Blue)
    }

    /// The email input
    pub fn email(store: Store) -> Self {
        Self::new(store, FieldId::Email, "Enter your email", Color::Green)
    }
}

impl FieldWidget for TextInput {
    fn binding(&self) -> &FieldBinding {
        &self.binding
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn height(&self) -> u16 {
        4
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let value = self.binding.value();
        let error = self.binding.error();
        draw_field(
            frame,
            area,
            &FieldView {
                label: self.field().label(),
                value: &value,
                placeholder: self.placeholder,
                error: &error,
                is_focused: self.focused,
                is_multiline: false,
                accent: self.accent,
                footer: None,
            },
        );
    }
}
