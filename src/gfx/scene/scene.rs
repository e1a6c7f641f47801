use crate::error::{ObjectError, RendererError};
use crate::gfx::renderer::attach;
use crate::gfx::surface::Surface;
use crate::signal::ShutdownSignal;

use super::manager::GameObjectManager;
use super::object::{ObjectBuilder, ObjectDescriptor, ObjectId, Parent};

/// Per-frame logic of a scene
///
/// The hook of the active scene runs once per frame, before compositing.
/// Closures taking a [`SceneContext`] implement it directly.
pub trait SceneHook {
    fn update(&mut self, ctx: &mut SceneContext<'_>);
}

impl<F> SceneHook for F
where
    F: FnMut(&mut SceneContext<'_>),
{
    fn update(&mut self, ctx: &mut SceneContext<'_>) {
        self(ctx)
    }
}

/// What a scene hook may touch during its update
pub struct SceneContext<'a> {
    scene: ObjectId,
    frame: u64,
    objects: &'a mut GameObjectManager,
    shutdown: &'a ShutdownSignal,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(
        scene: ObjectId,
        frame: u64,
        objects: &'a mut GameObjectManager,
        shutdown: &'a ShutdownSignal,
    ) -> Self {
        Self {
            scene,
            frame,
            objects,
            shutdown,
        }
    }

    /// Id of the scene being updated
    pub fn scene(&self) -> ObjectId {
        self.scene
    }

    /// Number of frames rendered before this one
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn objects(&self) -> &GameObjectManager {
        &*self.objects
    }

    pub fn objects_mut(&mut self) -> &mut GameObjectManager {
        &mut *self.objects
    }

    /// Assigns a parent to `id`, same rules as [`Renderer::render`](crate::gfx::Renderer::render)
    pub fn render(&mut self, id: ObjectId, parent: Option<Parent>) -> Result<(), RendererError> {
        attach(&mut *self.objects, id, parent)
    }

    /// Asks the engine to stop before the next frame
    pub fn request_quit(&self) {
        self.shutdown.request();
    }
}

/// Built-in descriptor behind `create_scene`
///
/// Scenes start with an empty transparent surface.
pub struct SceneDescriptor;

impl SceneDescriptor {
    pub(crate) fn builder(hook: Box<dyn SceneHook>) -> ObjectBuilder {
        ObjectBuilder::new(Surface::transparent(0, 0))
            .with_name("scene")
            .with_scene_hook(hook)
    }
}

impl ObjectDescriptor for SceneDescriptor {
    type Args = Box<dyn SceneHook>;

    fn construct(&self, hook: Self::Args) -> Result<ObjectBuilder, ObjectError> {
        Ok(Self::builder(hook))
    }
}
