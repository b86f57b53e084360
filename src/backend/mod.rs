//! Submission backend module

mod simulated;
mod traits;

pub use simulated::SimulatedBackend;
pub use traits::SubmitBackend;

#[cfg(test)]
pub use traits::MockSubmitBackend;
