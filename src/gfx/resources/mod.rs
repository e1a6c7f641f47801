// src/gfx/resources/mod.rs
//! Asset loading
//!
//! Turns files on disk into game objects.

pub mod loader;

// Re-export main types
pub use loader::Loader;
