//! Per-frame scene traversal and compositing

use log::{debug, info, trace};

use crate::error::{ObjectError, RendererError};
use crate::signal::ShutdownSignal;

use super::display::Display;
use super::scene::{GameObjectManager, ObjectId, Parent, SceneContext};

/// What a single [`Renderer::update`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Objects blitted onto their parent
    pub composited: usize,
    /// Objects skipped because nothing rendered them yet
    pub unparented: usize,
    /// Objects skipped because a surface involved was locked
    pub deferred: usize,
}

/// Assigns a parent, reporting a second assignment as a render usage error
pub(crate) fn attach(
    objects: &mut GameObjectManager,
    id: ObjectId,
    parent: Option<Parent>,
) -> Result<(), RendererError> {
    objects
        .assign_parent(id, parent.unwrap_or(Parent::Display))
        .map_err(|err| match err {
            ObjectError::AlreadyParented(id) => RendererError::AlreadyRendered(id),
            other => other.into(),
        })
}

/// Drives the active scene and composites every rendered object
pub struct Renderer {
    objects: GameObjectManager,
    shutdown: ShutdownSignal,
    frame: u64,
}

impl Renderer {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self {
            objects: GameObjectManager::new(),
            shutdown,
            frame: 0,
        }
    }

    pub fn setup(&mut self) {
        self.objects.setup();
    }

    pub fn objects(&self) -> &GameObjectManager {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut GameObjectManager {
        &mut self.objects
    }

    /// Frames rendered so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Marks `id` for compositing onto `parent` (the display when `None`)
    ///
    /// An object can only be rendered once; placement is done through its rect.
    pub fn render(&mut self, id: ObjectId, parent: Option<Parent>) -> Result<(), RendererError> {
        attach(&mut self.objects, id, parent)
    }

    /// Makes `scene` the active scene
    pub fn render_scene(&mut self, scene: ObjectId) -> Result<(), RendererError> {
        self.objects.set_active_scene(scene)?;
        info!("Rendering scene {}", scene);
        Ok(())
    }

    /// Runs one frame: scene hook, compositing in creation order, flip
    pub fn update(&mut self, display: &mut Display) -> Result<FrameStats, RendererError> {
        if display.is_destroyed() {
            return Err(crate::error::DisplayError::Destroyed.into());
        }

        self.run_scene_hook();

        let mut stats = FrameStats::default();
        for index in 0..self.objects.len() {
            let Some(object) = self.objects.object_at(index) else {
                break;
            };
            let Some(parent) = object.parent() else {
                stats.unparented += 1;
                continue;
            };
            if object.surface.is_locked() {
                stats.deferred += 1;
                continue;
            }

            match parent {
                Parent::Display => {
                    let (x, y) = object.rect.position();
                    display.surface_mut().blit(&object.surface, x, y);
                }
                Parent::Object(target) => {
                    let target_locked = match self.objects.get(target) {
                        Some(target) => target.surface.is_locked(),
                        None => {
                            debug!("Object #{} has a stale parent {}", index, target);
                            continue;
                        }
                    };
                    if target_locked {
                        stats.deferred += 1;
                        continue;
                    }
                    self.objects.blit_between(index, target.index());
                }
            }
            stats.composited += 1;
        }

        display.flip()?;
        self.frame += 1;
        trace!(
            "frame {}: {} composited, {} unparented, {} deferred",
            self.frame,
            stats.composited,
            stats.unparented,
            stats.deferred
        );
        Ok(stats)
    }

    pub fn destroy(&mut self) {
        self.objects.destroy();
    }

    fn run_scene_hook(&mut self) {
        let Some(scene) = self.objects.active_scene() else {
            return;
        };
        // The hook is moved out while it runs so it can borrow the arena
        if let Some(mut hook) = self.objects.take_scene_hook(scene) {
            let mut ctx = SceneContext::new(scene, self.frame, &mut self.objects, &self.shutdown);
            hook.update(&mut ctx);
            self.objects.restore_scene_hook(scene, hook);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    use rand::Rng;

    use super::*;
    use crate::config::EngineConfig;
    use crate::error::DisplayError;
    use crate::gfx::surface::{Color, Surface};
    use crate::platform::{HeadlessPresenter, PresenterStats};

    fn setup(width: u32, height: u32) -> (Renderer, Display, Arc<PresenterStats>) {
        let presenter = HeadlessPresenter::new();
        let stats = presenter.stats();
        let config = EngineConfig::default().with_size(width, height);
        (
            Renderer::new(ShutdownSignal::new()),
            Display::new(&config, Box::new(presenter)),
            stats,
        )
    }

    #[test]
    fn render_twice_fails_and_keeps_first_parent() {
        let (mut renderer, _display, _) = setup(4, 4);
        let objects = renderer.objects_mut();
        let a = objects.create(Surface::new(1, 1));
        let b = objects.create(Surface::new(1, 1));

        renderer.render(a, Some(Parent::Object(b))).unwrap();

        assert_eq!(
            renderer.render(a, None),
            Err(RendererError::AlreadyRendered(a))
        );
        assert_eq!(
            renderer.render(a, Some(Parent::Object(b))),
            Err(RendererError::AlreadyRendered(a))
        );
        assert_eq!(
            renderer.objects().get(a).unwrap().parent(),
            Some(Parent::Object(b))
        );
    }

    #[test]
    fn render_twice_fails_for_random_parents() {
        let mut rng = rand::rng();
        let (mut renderer, _display, _) = setup(4, 4);
        let ids: Vec<_> = (0..32)
            .map(|_| renderer.objects_mut().create(Surface::new(1, 1)))
            .collect();

        let pick_parent = |rng: &mut rand::rngs::ThreadRng, me: ObjectId| loop {
            if rng.random_bool(0.3) {
                return Parent::Display;
            }
            let other = ids[rng.random_range(0..ids.len())];
            if other != me {
                return Parent::Object(other);
            }
        };

        for &id in &ids {
            let first = pick_parent(&mut rng, id);
            renderer.render(id, Some(first)).unwrap();

            let second = pick_parent(&mut rng, id);
            assert_eq!(
                renderer.render(id, Some(second)),
                Err(RendererError::AlreadyRendered(id))
            );
            assert_eq!(renderer.objects().get(id).unwrap().parent(), Some(first));
        }
    }

    #[test]
    fn render_defaults_to_display() {
        let (mut renderer, _display, _) = setup(4, 4);
        let id = renderer.objects_mut().create(Surface::new(1, 1));

        renderer.render(id, None).unwrap();

        assert_eq!(
            renderer.objects().get(id).unwrap().parent(),
            Some(Parent::Display)
        );
    }

    #[test]
    fn unparented_objects_are_never_composited() {
        let (mut renderer, mut display, stats) = setup(4, 4);
        let hidden = renderer
            .objects_mut()
            .create(Surface::filled(4, 4, Color::WHITE));
        renderer.objects_mut().get_mut(hidden).unwrap().rect.move_to(0, 0);
        let shown = renderer
            .objects_mut()
            .create(Surface::filled(1, 1, Color::rgb(0, 255, 0)));
        renderer.objects_mut().get_mut(shown).unwrap().rect.move_to(3, 3);
        renderer.render(shown, None).unwrap();

        let frame = renderer.update(&mut display).unwrap();

        assert_eq!(
            frame,
            FrameStats {
                composited: 1,
                unparented: 1,
                deferred: 0
            }
        );
        assert_eq!(display.surface().pixel(0, 0), Some(Color::BLACK));
        assert_eq!(display.surface().pixel(3, 3), Some(Color::rgb(0, 255, 0)));
        assert_eq!(stats.frames(), 1);
        assert_eq!(renderer.frame(), 1);
    }

    #[test]
    fn locked_objects_are_deferred_to_a_later_frame() {
        let (mut renderer, mut display, _) = setup(2, 2);
        let id = renderer
            .objects_mut()
            .create(Surface::filled(1, 1, Color::WHITE));
        renderer.render(id, None).unwrap();
        renderer.objects_mut().get_mut(id).unwrap().surface.lock();

        let frame = renderer.update(&mut display).unwrap();
        assert_eq!(frame.deferred, 1);
        assert_eq!(display.surface().pixel(0, 0), Some(Color::BLACK));

        renderer.objects_mut().get_mut(id).unwrap().surface.unlock();
        display.update().unwrap();
        let frame = renderer.update(&mut display).unwrap();
        assert_eq!(frame.composited, 1);
        assert_eq!(display.surface().pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn locked_parent_defers_child() {
        let (mut renderer, mut display, _) = setup(2, 2);
        let objects = renderer.objects_mut();
        let parent = objects.create(Surface::new(2, 2));
        let child = objects.create(Surface::filled(1, 1, Color::WHITE));
        objects.get_mut(parent).unwrap().surface.lock();
        renderer.render(child, Some(Parent::Object(parent))).unwrap();

        let frame = renderer.update(&mut display).unwrap();

        assert_eq!(frame.deferred, 1);
        assert_eq!(
            renderer.objects().get(parent).unwrap().surface.pixel(0, 0),
            Some(Color::BLACK)
        );
    }

    #[test]
    fn later_objects_draw_on_top() {
        let (mut renderer, mut display, _) = setup(2, 1);
        let objects = renderer.objects_mut();
        let red = objects.create(Surface::filled(2, 1, Color::rgb(255, 0, 0)));
        let blue = objects.create(Surface::filled(1, 1, Color::rgb(0, 0, 255)));
        objects.get_mut(blue).unwrap().rect.move_to(1, 0);
        renderer.render(red, None).unwrap();
        renderer.render(blue, None).unwrap();

        renderer.update(&mut display).unwrap();

        assert_eq!(display.surface().pixel(0, 0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(display.surface().pixel(1, 0), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn children_composite_onto_object_parents() {
        let (mut renderer, mut display, _) = setup(4, 4);
        let objects = renderer.objects_mut();
        let panel = objects.create(Surface::new(2, 2));
        let dot = objects.create(Surface::filled(1, 1, Color::WHITE));
        objects.get_mut(dot).unwrap().rect.move_to(1, 1);
        objects.get_mut(panel).unwrap().rect.move_to(2, 2);
        renderer.render(panel, None).unwrap();
        renderer.render(dot, Some(Parent::Object(panel))).unwrap();

        // panel is drawn before the dot lands on it
        renderer.update(&mut display).unwrap();
        assert_eq!(display.surface().pixel(3, 3), Some(Color::BLACK));
        assert_eq!(
            renderer.objects().get(panel).unwrap().surface.pixel(1, 1),
            Some(Color::WHITE)
        );

        display.update().unwrap();
        renderer.update(&mut display).unwrap();
        assert_eq!(display.surface().pixel(3, 3), Some(Color::WHITE));
    }

    #[test]
    fn active_scene_hook_runs_each_frame() {
        let (mut renderer, mut display, _) = setup(2, 2);
        let calls = Rc::new(Cell::new(0u64));
        let seen = calls.clone();
        let scene = renderer
            .objects_mut()
            .create_scene(move |ctx: &mut SceneContext<'_>| {
                assert_eq!(ctx.frame(), seen.get());
                seen.set(seen.get() + 1);
            });

        renderer.update(&mut display).unwrap();
        assert_eq!(calls.get(), 0);

        renderer.render_scene(scene).unwrap();
        renderer.update(&mut display).unwrap();
        renderer.update(&mut display).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn scene_hook_can_spawn_and_render_objects() {
        let (mut renderer, mut display, _) = setup(2, 2);
        let scene = renderer
            .objects_mut()
            .create_scene(|ctx: &mut SceneContext<'_>| {
                if ctx.frame() == 0 {
                    let id = ctx
                        .objects_mut()
                        .create(Surface::filled(1, 1, Color::WHITE));
                    ctx.render(id, None).unwrap();
                    assert!(ctx.render(id, None).is_err());
                }
            });
        renderer.render_scene(scene).unwrap();

        let frame = renderer.update(&mut display).unwrap();

        assert_eq!(frame.composited, 1);
        assert_eq!(display.surface().pixel(0, 0), Some(Color::WHITE));
        assert_eq!(renderer.objects().len(), 2);
    }

    #[test]
    fn scene_hook_can_request_quit() {
        let shutdown = ShutdownSignal::new();
        let mut renderer = Renderer::new(shutdown.clone());
        let config = EngineConfig::default().with_size(1, 1);
        let mut display = Display::new(&config, Box::new(HeadlessPresenter::new()));
        let scene = renderer
            .objects_mut()
            .create_scene(|ctx: &mut SceneContext<'_>| ctx.request_quit());
        renderer.render_scene(scene).unwrap();

        renderer.update(&mut display).unwrap();

        assert!(shutdown.is_requested());
    }

    #[test]
    fn render_scene_rejects_plain_objects() {
        let (mut renderer, _display, _) = setup(1, 1);
        let sprite = renderer.objects_mut().create(Surface::new(1, 1));

        assert_eq!(
            renderer.render_scene(sprite),
            Err(RendererError::Object(ObjectError::NotAScene(sprite)))
        );
    }

    #[test]
    fn update_after_display_destroy_fails() {
        let (mut renderer, mut display, stats) = setup(1, 1);
        display.destroy();

        assert_eq!(
            renderer.update(&mut display),
            Err(RendererError::Display(DisplayError::Destroyed))
        );
        assert_eq!(stats.frames(), 0);
    }

    #[test]
    fn destroy_clears_objects() {
        let (mut renderer, _display, _) = setup(1, 1);
        renderer.objects_mut().create(Surface::new(1, 1));
        renderer.setup();
        assert!(renderer.objects().is_ready());

        renderer.destroy();

        assert!(renderer.objects().is_empty());
        assert_eq!(renderer.objects().generation(), 1);
    }
}
