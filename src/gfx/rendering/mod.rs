// src/gfx/rendering/mod.rs
//! Frame presentation
//!
//! Puts the composited root surface on screen through wgpu.

pub mod render_engine;

// Re-export main types
pub use render_engine::RenderEngine;
