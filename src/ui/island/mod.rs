//! Island widgets and the adapter that mounts them into the host
//!
//! - `container`: the mount point shared between host and island
//! - `adapter`: `Island` contract, factories and the per-site mount adapter
//! - `select_input`: the country select island

mod adapter;
mod container;
pub mod select_input;

pub use adapter::{IslandFactory, MountAdapter};
pub use container::IslandEvent;
