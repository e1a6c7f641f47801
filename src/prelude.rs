//! # Kiln Prelude
//!
//! This module provides a convenient way to import commonly used types and traits
//! from the Kiln engine. It's designed to reduce boilerplate imports in typical
//! games.
//!
//! ## Usage
//!
//! ```rust
//! use kiln::prelude::*;
//! ```
//!
//! This brings all essential types into scope, allowing you to write:
//!
//! ```no_run
//! use kiln::prelude::*;
//!
//! fn main() -> EngineResult<()> {
//!     let mut engine = Engine::new(EngineConfig::default().with_title("demo"))?;
//!
//!     let player = engine.load_transparent_image("player.png", false)?;
//!     engine.render(player, None)?;
//!
//!     let scene = engine.load_scene(move |ctx: &mut SceneContext<'_>| {
//!         if let Some(player) = ctx.objects_mut().get_mut(player) {
//!             player.rect.translate(1, 0);
//!         }
//!     });
//!     engine.render_scene(scene)?;
//!
//!     engine.setup();
//!     engine.run()
//! }
//! ```

// Re-export core engine types
pub use crate::config::{DisplayFlags, EngineConfig};
pub use crate::engine::{Engine, EngineState, LoopExit};
pub use crate::error::{
    DisplayError, EngineError, EngineResult, LoaderError, ObjectError, RendererError,
};
pub use crate::signal::{InterruptHandle, ShutdownSignal};

// Re-export graphics and scene types
pub use crate::gfx::display::Display;
pub use crate::gfx::renderer::{FrameStats, Renderer};
pub use crate::gfx::resources::Loader;
pub use crate::gfx::scene::{
    GameObject, GameObjectManager, ObjectBuilder, ObjectDescriptor, ObjectId, Parent,
    SceneContext, SceneHook,
};
pub use crate::gfx::surface::{Color, Rect, Surface};

// Re-export platform seams
pub use crate::platform::{EngineEvent, EventSource, HeadlessPresenter, Presenter, ScriptedEvents};

// Re-export the task system
pub use crate::task::{Task, TaskManager};
