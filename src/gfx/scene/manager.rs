//! Object arena
//!
//! The manager owns every game object in creation order. Parents are stored as
//! handles into this arena, so no object ever owns another.

use std::sync::atomic::{AtomicU32, Ordering};

use log::{debug, info};

use crate::error::ObjectError;
use crate::gfx::surface::Surface;

use super::object::{GameObject, ObjectBuilder, ObjectDescriptor, ObjectId, Parent};
use super::scene::{SceneDescriptor, SceneHook};

static NEXT_OWNER: AtomicU32 = AtomicU32::new(1);

/// Owns all game objects and tracks the active scene
#[derive(Debug)]
pub struct GameObjectManager {
    owner: u32,
    objects: Vec<GameObject>,
    active_scene: Option<ObjectId>,
    generation: u32,
    ready: bool,
}

impl Default for GameObjectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GameObjectManager {
    pub fn new() -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            objects: Vec::new(),
            active_scene: None,
            generation: 0,
            ready: false,
        }
    }

    /// Lifecycle hook run before the first frame
    pub fn setup(&mut self) {
        self.ready = true;
        debug!("Object manager ready ({} objects)", self.objects.len());
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Releases every object and clears the active scene
    ///
    /// Handles issued before this call stop resolving.
    pub fn destroy(&mut self) {
        info!("Releasing {} game objects", self.objects.len());
        self.objects.clear();
        self.active_scene = None;
        self.generation += 1;
        self.ready = false;
    }

    /// Number of times the manager has been torn down
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Wraps a drawable into a new unparented object with a zero rect
    pub fn create(&mut self, surface: Surface) -> ObjectId {
        self.register(ObjectBuilder::new(surface))
    }

    /// Constructs an object through `descriptor` and registers it
    pub fn create_with<D>(&mut self, descriptor: &D, args: D::Args) -> Result<ObjectId, ObjectError>
    where
        D: ObjectDescriptor + ?Sized,
    {
        let builder = descriptor.construct(args)?;
        Ok(self.register(builder))
    }

    /// Creates a scene driven by `hook`. The scene is not activated.
    pub fn create_scene<H>(&mut self, hook: H) -> ObjectId
    where
        H: SceneHook + 'static,
    {
        self.register(SceneDescriptor::builder(Box::new(hook)))
    }

    /// Registers a configured builder
    pub fn register(&mut self, builder: ObjectBuilder) -> ObjectId {
        let id = ObjectId::new(self.owner, self.objects.len(), self.generation);
        let object = builder.build(id);
        debug!(
            "Registered {} {} ({}x{})",
            if object.is_scene() { "scene" } else { "object" },
            id,
            object.surface.width(),
            object.surface.height()
        );
        self.objects.push(object);
        id
    }

    /// All registered objects in creation order. Each call starts over.
    pub fn get_game_objects(&self) -> impl Iterator<Item = &GameObject> + '_ {
        self.objects.iter()
    }

    pub fn get_game_objects_mut(&mut self) -> impl Iterator<Item = &mut GameObject> + '_ {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    fn owns(&self, id: ObjectId) -> bool {
        id.owner() == self.owner && id.generation() == self.generation
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        if !self.owns(id) {
            return None;
        }
        self.objects.get(id.index())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        if !self.owns(id) {
            return None;
        }
        self.objects.get_mut(id.index())
    }

    /// Objects whose parent is `parent`, in creation order
    pub fn children(&self, parent: Parent) -> impl Iterator<Item = &GameObject> + '_ {
        self.objects
            .iter()
            .filter(move |object| object.parent() == Some(parent))
    }

    /// Sets the parent of `id`. A parent can only be assigned once.
    pub fn assign_parent(&mut self, id: ObjectId, parent: Parent) -> Result<(), ObjectError> {
        if let Parent::Object(target) = parent {
            if target == id {
                return Err(ObjectError::SelfParent(id));
            }
            if !self.contains(target) {
                return Err(ObjectError::UnknownObject(target));
            }
        }

        let object = self.get_mut(id).ok_or(ObjectError::UnknownObject(id))?;
        object.set_parent(parent)?;
        debug!("Object {} attached to {:?}", id, parent);
        Ok(())
    }

    pub fn active_scene(&self) -> Option<ObjectId> {
        self.active_scene
    }

    /// Activates a scene, replacing the previous one
    ///
    /// The id must belong to this manager and refer to a scene.
    pub fn set_active_scene(&mut self, id: ObjectId) -> Result<(), ObjectError> {
        let object = self.get(id).ok_or(ObjectError::UnknownObject(id))?;
        if !object.is_scene() {
            return Err(ObjectError::NotAScene(id));
        }
        self.active_scene = Some(id);
        debug!("Scene {} is now active", id);
        Ok(())
    }

    pub fn clear_active_scene(&mut self) {
        self.active_scene = None;
    }

    pub(crate) fn take_scene_hook(&mut self, id: ObjectId) -> Option<Box<dyn SceneHook>> {
        self.get_mut(id).and_then(GameObject::take_hook)
    }

    pub(crate) fn restore_scene_hook(&mut self, id: ObjectId, hook: Box<dyn SceneHook>) {
        if let Some(object) = self.get_mut(id) {
            object.restore_hook(hook);
        }
    }

    pub(crate) fn object_at(&self, index: usize) -> Option<&GameObject> {
        self.objects.get(index)
    }

    /// Blits object `src` onto object `dst`, both by arena index
    pub(crate) fn blit_between(&mut self, src: usize, dst: usize) -> usize {
        if src == dst || src >= self.objects.len() || dst >= self.objects.len() {
            return 0;
        }

        let (source, target) = if src < dst {
            let (head, tail) = self.objects.split_at_mut(dst);
            (&head[src], &mut tail[0])
        } else {
            let (head, tail) = self.objects.split_at_mut(src);
            (&tail[0], &mut head[dst])
        };

        let (x, y) = source.rect.position();
        target.surface.blit(&source.surface, x, y)
    }
}
