// src/lib.rs
//! Kiln 2D Engine
//!
//! A minimal 2D game engine scaffold: CPU surfaces are composited through a
//! scene/object renderer and presented into a winit window with wgpu.

#[cfg(not(target_arch = "wasm32"))]
pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod gfx;
pub mod logging;
pub mod platform;
pub mod prelude;
pub mod signal;
pub mod task;

// Re-export main types for convenience
pub use config::{DisplayFlags, EngineConfig};
pub use engine::{Engine, EngineState, LoopExit};
pub use error::{EngineError, EngineResult};

/// Creates an engine with a default 800x600 window
#[cfg(not(target_arch = "wasm32"))]
pub fn default() -> EngineResult<Engine> {
    Engine::new(EngineConfig::default())
}
