//! Multi-line host widget (message)

use super::binding::{FieldBinding, FieldWidget};
use super::field_renderer::{draw_field, FieldView};
use crate::state::{FieldId, Store, MESSAGE_MAX_LEN};
use ratatui::{layout::Rect, style::Color, Frame};

#[derive(Debug, Clone)]
pub struct TextAreaInput {
    binding: FieldBinding,
    focused: bool,
}

impl TextAreaInput {
    const PLACEHOLDER: &'static str = "Tell us about your experience with micro frontends...";

    pub fn message(store: Store) -> Self {
        Self {
            binding: FieldBinding::new(store, FieldId::Message),
            focused: false,
        }
    }

    /// "<chars>/<max>" counter shown in the bottom border
    pub fn counter(&self) -> String {
        format!(
            "{}/{}",
            self.binding.value().chars().count(),
            MESSAGE_MAX_LEN
        )
    }
}

impl FieldWidget for TextAreaInput {
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
        8
    }

    fn accepts_newline(&self) -> bool {
        true
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
                placeholder: Self::PLACEHOLDER,
                error: &error,
                is_focused: self.focused,
                is_multiline: true,
                accent: Color::Magenta,
                footer: Some(self.counter()),
            },
        );
    }
}
