use std::fmt;

use crate::error::ObjectError;
use crate::gfx::surface::{Rect, Surface};

use super::scene::SceneHook;

/// Handle to an object owned by a [`GameObjectManager`](super::GameObjectManager)
///
/// A handle only resolves in the manager that issued it. The generation ties
/// it to one lifetime of that manager: after the manager is destroyed, old
/// handles no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    owner: u32,
    index: usize,
    generation: u32,
}

impl ObjectId {
    pub(crate) fn new(owner: u32, index: usize, generation: u32) -> Self {
        Self {
            owner,
            index,
            generation,
        }
    }

    pub(crate) fn owner(&self) -> u32 {
        self.owner
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// What an object composites onto. Never owns the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The display's root surface
    Display,
    Object(ObjectId),
}

impl From<ObjectId> for Parent {
    fn from(id: ObjectId) -> Self {
        Parent::Object(id)
    }
}

/// The closed set of object variants
pub enum ObjectKind {
    Sprite,
    Scene(Option<Box<dyn SceneHook>>),
}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Sprite => f.write_str("Sprite"),
            ObjectKind::Scene(_) => f.write_str("Scene"),
        }
    }
}

/// An entity with a drawable surface, an optional parent and a placement rect
#[derive(Debug)]
pub struct GameObject {
    id: ObjectId,
    name: Option<String>,
    pub surface: Surface,
    pub rect: Rect,
    parent: Option<Parent>,
    kind: ObjectKind,
}

impl GameObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// The parent assigned by rendering, if any
    pub fn parent(&self) -> Option<Parent> {
        self.parent
    }

    pub fn is_rendered(&self) -> bool {
        self.parent.is_some()
    }

    pub fn is_scene(&self) -> bool {
        matches!(self.kind, ObjectKind::Scene(_))
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub(crate) fn set_parent(&mut self, parent: Parent) -> Result<(), ObjectError> {
        if self.parent.is_some() {
            return Err(ObjectError::AlreadyParented(self.id));
        }
        self.parent = Some(parent);
        Ok(())
    }

    pub(crate) fn take_hook(&mut self) -> Option<Box<dyn SceneHook>> {
        match &mut self.kind {
            ObjectKind::Scene(hook) => hook.take(),
            ObjectKind::Sprite => None,
        }
    }

    pub(crate) fn restore_hook(&mut self, restored: Box<dyn SceneHook>) {
        if let ObjectKind::Scene(hook) = &mut self.kind {
            if hook.is_none() {
                *hook = Some(restored);
            }
        }
    }
}

/// Builder for configuring a new object before it is registered
///
/// The id is assigned by the manager when the builder is registered.
pub struct ObjectBuilder {
    surface: Surface,
    rect: Rect,
    name: Option<String>,
    kind: ObjectKind,
}

impl ObjectBuilder {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            rect: Rect::default(),
            name: None,
            kind: ObjectKind::Sprite,
        }
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Turns the object into a scene driven by `hook`
    pub fn with_scene_hook(mut self, hook: Box<dyn SceneHook>) -> Self {
        self.kind = ObjectKind::Scene(Some(hook));
        self
    }

    pub(crate) fn build(self, id: ObjectId) -> GameObject {
        GameObject {
            id,
            name: self.name,
            surface: self.surface,
            rect: self.rect,
            parent: None,
            kind: self.kind,
        }
    }
}

/// A factory for a custom object type
///
/// Implement this for each entity type; the manager's `create_with` runs
/// `construct` and registers the result.
///
/// ```
/// use kiln::prelude::*;
///
/// struct Tile {
///     color: Color,
/// }
///
/// impl ObjectDescriptor for Tile {
///     type Args = (u32, u32);
///
///     fn construct(&self, (w, h): (u32, u32)) -> Result<ObjectBuilder, ObjectError> {
///         Ok(ObjectBuilder::new(Surface::filled(w, h, self.color)).with_name("tile"))
///     }
/// }
///
/// let mut objects = GameObjectManager::new();
/// let id = objects.create_with(&Tile { color: Color::WHITE }, (8, 8)).unwrap();
/// assert_eq!(objects.get(id).unwrap().surface.size(), (8, 8));
/// ```
pub trait ObjectDescriptor {
    type Args;

    fn construct(&self, args: Self::Args) -> Result<ObjectBuilder, ObjectError>;
}
