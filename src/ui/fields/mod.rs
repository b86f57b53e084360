//! Host field widgets
//!
//! - `binding`: the store contract shared with island widgets
//! - `field_renderer`: input box drawing
//! - `text_input`: single-line inputs (name, email)
//! - `textarea_input`: multi-line input (message)

mod binding;
mod field_renderer;
mod text_input;
mod textarea_input;

pub use binding::{FieldBinding, FieldWidget};
pub use text_input::TextInput;
pub use textarea_input::TextAreaInput;
