//! # Graphics Module
//!
//! This module contains all drawing-related functionality for the Kiln 2D engine,
//! including surfaces, the display, the object model and the per-frame renderer.
//!
//! ## Architecture Overview
//!
//! The graphics system is organized into several key components:
//!
//! - **Surfaces** ([`surface`]) - CPU pixel buffers with fill, blit and alpha blending
//! - **Display** ([`display`]) - Root surface cleared every frame and flipped to screen
//! - **Scene Management** ([`scene`]) - Object arena, parent handles and scenes
//! - **Renderer** ([`renderer`]) - Active scene update and creation-order compositing
//! - **Resources** ([`resources`]) - Image loading into game objects
//! - **Presentation** ([`rendering`]) - wgpu backend showing the root surface
//!
//! ## Usage
//!
//! The graphics system is primarily used through the [`Renderer`] and [`Display`] types:
//!
//! ```
//! use kiln::config::EngineConfig;
//! use kiln::gfx::{Display, Renderer, surface::Surface};
//! use kiln::platform::HeadlessPresenter;
//! use kiln::signal::ShutdownSignal;
//!
//! let config = EngineConfig::default().with_size(64, 64);
//! let mut display = Display::new(&config, Box::new(HeadlessPresenter::new()));
//! let mut renderer = Renderer::new(ShutdownSignal::new());
//!
//! let sprite = renderer.objects_mut().create(Surface::new(8, 8));
//! renderer.render(sprite, None).unwrap();
//!
//! display.update().unwrap();
//! let frame = renderer.update(&mut display).unwrap();
//! assert_eq!(frame.composited, 1);
//! ```

pub mod display;
pub mod renderer;
#[cfg(not(target_arch = "wasm32"))]
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod surface;

// Re-export commonly used types
pub use display::Display;
pub use renderer::{FrameStats, Renderer};
#[cfg(not(target_arch = "wasm32"))]
pub use rendering::render_engine::RenderEngine;
