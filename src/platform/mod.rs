//! Seams to the windowing and presentation layer
//!
//! The engine only talks to the outside world through [`EventSource`] and
//! [`Presenter`]. The windowed backend lives in [`crate::app`] (winit) and
//! [`crate::gfx::rendering`] (wgpu); [`headless`] provides in-memory versions
//! for tests and offscreen use.

pub mod headless;

use crate::error::DisplayError;
use crate::gfx::surface::Surface;

pub use headless::{HeadlessPresenter, PresenterStats, ScriptedEvents};

/// Events the main loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The window was closed or the platform asked the app to exit
    Quit,
    Resized { width: u32, height: u32 },
}

/// A non-blocking queue of platform events
pub trait EventSource {
    /// Returns every event that arrived since the last call
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}

/// Puts a finished frame on screen
pub trait Presenter {
    fn present(&mut self, frame: &Surface) -> Result<(), DisplayError>;

    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Releases the presentation context. Called once.
    fn release(&mut self) {}
}
