//! # Scene Management Module
//!
//! This module provides the game object model: an arena of objects that own a
//! drawable surface and a placement rect, the non-owning parent handles that
//! decide what each object is composited onto, and scenes whose update hook
//! runs once per frame while they are active.
//!
//! ## Key Components
//!
//! - [`GameObjectManager`] - Arena owning every object in creation order
//! - [`GameObject`] - Surface, rect and parent of a single entity
//! - [`ObjectBuilder`] / [`ObjectDescriptor`] - Configuring and constructing custom entity types
//! - [`SceneHook`] / [`SceneContext`] - Per-frame logic of the active scene
//!
//! ## Usage
//!
//! ```
//! use kiln::gfx::scene::{GameObjectManager, Parent, SceneContext};
//! use kiln::gfx::surface::Surface;
//!
//! let mut objects = GameObjectManager::new();
//! let sprite = objects.create(Surface::new(16, 16));
//! let scene = objects.create_scene(|ctx: &mut SceneContext<'_>| {
//!     let _ = ctx.frame();
//! });
//!
//! objects.assign_parent(sprite, Parent::Display).unwrap();
//! objects.set_active_scene(scene).unwrap();
//! ```
//!
//! ## Object Management
//!
//! Objects support:
//! - Creation from a raw surface or through a descriptor
//! - A parent assigned at most once (the display or another object)
//! - Creation-order traversal, which is also the draw order

pub mod manager;
pub mod object;
pub mod scene;

// Re-export main types
pub use manager::GameObjectManager;
pub use object::{GameObject, ObjectBuilder, ObjectDescriptor, ObjectId, ObjectKind, Parent};
pub use scene::{SceneContext, SceneDescriptor, SceneHook};
