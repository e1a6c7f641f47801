//! Task system
//!
//! Cooperative tasks started once before the engine's main loop.

pub mod manager;
pub mod traits;

pub use manager::TaskManager;
pub use traits::{FnTask, Task};
