//! Application state module

mod controller;
mod form_data;
mod store;
mod validation;

pub use controller::*;
pub use form_data::*;
pub use store::*;
pub use validation::*;
