//! The engine: owns every component and drives the main loop

use std::path::Path;

use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, LoaderError, RendererError};
use crate::gfx::display::Display;
use crate::gfx::renderer::{FrameStats, Renderer};
use crate::gfx::resources::Loader;
use crate::gfx::scene::{ObjectDescriptor, ObjectId, Parent, SceneHook};
use crate::platform::{EngineEvent, EventSource, HeadlessPresenter, Presenter, ScriptedEvents};
use crate::signal::{InterruptHandle, ShutdownSignal};
use crate::task::TaskManager;

/// Lifecycle of an [`Engine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Constructed,
    Setup,
    Running,
    ShuttingDown,
    Destroyed,
}

/// Why [`Engine::mainloop`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The platform delivered a quit event
    QuitEvent,
    /// The shutdown flag was set
    Shutdown,
}

pub struct Engine {
    display: Display,
    loader: Loader,
    renderer: Renderer,
    task_manager: TaskManager,
    events: Box<dyn EventSource>,
    shutdown: ShutdownSignal,
    interrupt: InterruptHandle,
    state: EngineState,
    last_frame: FrameStats,
}

impl Engine {
    /// Opens a window and a wgpu presenter for it
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        crate::logging::init(&config.log_filter);

        let (events, window) = crate::app::WindowEvents::open(&config)?;
        let size = window.inner_size();
        let presenter = pollster::block_on(crate::gfx::rendering::RenderEngine::new(
            window,
            size.width,
            size.height,
            config.flags,
        ))?;

        // The platform may not honour the requested size
        let config = config.with_size(size.width, size.height);
        let engine = Self::with_backend(config, Box::new(presenter), Box::new(events));
        engine.catch_interrupts();
        Ok(engine)
    }

    /// Builds an engine on top of any presenter and event source
    pub fn with_backend(
        config: EngineConfig,
        presenter: Box<dyn Presenter>,
        events: Box<dyn EventSource>,
    ) -> Self {
        let shutdown = ShutdownSignal::new();
        Self {
            display: Display::new(&config, presenter),
            loader: Loader::new(config.asset_root.clone()),
            renderer: Renderer::new(shutdown.clone()),
            task_manager: TaskManager::new(),
            events,
            shutdown,
            interrupt: InterruptHandle::new(),
            state: EngineState::Constructed,
            last_frame: FrameStats::default(),
        }
    }

    /// An offscreen engine that never receives platform events
    pub fn headless(config: EngineConfig) -> Self {
        Self::with_backend(
            config,
            Box::new(HeadlessPresenter::new()),
            Box::new(ScriptedEvents::new()),
        )
    }

    /// Prepares the renderer. Does nothing once the engine is destroyed.
    pub fn setup(&mut self) {
        if self.state == EngineState::Destroyed {
            warn!("Ignoring setup of a destroyed engine");
            return;
        }
        self.renderer.setup();
        self.state = EngineState::Setup;
        info!("Engine set up");
    }

    /// One frame: clear the display, then render
    pub fn update(&mut self) -> EngineResult<()> {
        self.display.update()?;
        self.last_frame = self.renderer.update(&mut self.display)?;
        Ok(())
    }

    /// Polls events and renders frames until a quit event or shutdown
    ///
    /// # Errors
    /// [`EngineError::Interrupted`] when the interrupt handle fired; any
    /// frame error is passed through.
    pub fn mainloop(&mut self) -> EngineResult<LoopExit> {
        loop {
            if self.shutdown.is_requested() {
                debug!("Shutdown requested, leaving main loop");
                return Ok(LoopExit::Shutdown);
            }
            if self.interrupt.take() {
                return Err(EngineError::Interrupted);
            }

            for event in self.events.poll_events() {
                match event {
                    EngineEvent::Quit => {
                        info!("Quit event received");
                        return Ok(LoopExit::QuitEvent);
                    }
                    EngineEvent::Resized { width, height } => {
                        self.display.resize(width, height)?;
                    }
                }
            }

            self.update()?;
        }
    }

    /// Starts the tasks, runs the main loop and tears everything down
    ///
    /// An interrupt is handled like [`Engine::quit`]. `destroy` runs exactly
    /// once however the loop ends; errors are returned after teardown.
    pub fn run(&mut self) -> EngineResult<()> {
        if self.state == EngineState::Destroyed {
            return Err(EngineError::Destroyed);
        }

        self.task_manager.run();
        self.state = EngineState::Running;
        info!("Engine running");

        let outcome = match self.mainloop() {
            Ok(exit) => {
                debug!("Main loop exited: {:?}", exit);
                Ok(())
            }
            Err(EngineError::Interrupted) => {
                warn!("Interrupted, shutting down");
                self.quit();
                Ok(())
            }
            Err(err) => Err(err),
        };

        self.state = EngineState::ShuttingDown;
        self.destroy();
        outcome
    }

    /// Requests shutdown; the current frame still completes
    pub fn quit(&mut self) {
        self.shutdown.request();
    }

    /// Destroys the display, then the renderer. Later calls do nothing.
    pub fn destroy(&mut self) {
        if self.state == EngineState::Destroyed {
            return;
        }
        self.display.destroy();
        self.renderer.destroy();
        self.state = EngineState::Destroyed;
        info!("Engine destroyed");
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_requested()
    }

    /// Handle for requesting shutdown from elsewhere (another thread, a task)
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Handle to deliver a user interrupt, e.g. from a Ctrl-C handler
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// Routes Ctrl-C to this engine's interrupt handle
    ///
    /// `Engine::new` does this itself; other backends opt in. Returns `false`
    /// when the process handler could not be installed.
    pub fn catch_interrupts(&self) -> bool {
        crate::signal::catch_ctrl_c(&self.interrupt)
    }

    /// Statistics of the most recent frame
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn task_manager_mut(&mut self) -> &mut TaskManager {
        &mut self.task_manager
    }

    pub fn load_image(
        &mut self,
        path: impl AsRef<Path>,
        is_transparent: bool,
        flipped: bool,
    ) -> Result<ObjectId, LoaderError> {
        self.loader
            .load_image(self.renderer.objects_mut(), path, is_transparent, flipped)
    }

    pub fn load_transparent_image(
        &mut self,
        path: impl AsRef<Path>,
        flipped: bool,
    ) -> Result<ObjectId, LoaderError> {
        self.loader
            .load_transparent_image(self.renderer.objects_mut(), path, flipped)
    }

    pub fn load_object<D>(&mut self, descriptor: &D) -> Result<ObjectId, LoaderError>
    where
        D: ObjectDescriptor + ?Sized,
        D::Args: Default,
    {
        self.loader.load_object(self.renderer.objects_mut(), descriptor)
    }

    pub fn load_scene<H>(&mut self, hook: H) -> ObjectId
    where
        H: SceneHook + 'static,
    {
        self.loader.load_scene(self.renderer.objects_mut(), hook)
    }

    pub fn render(&mut self, id: ObjectId, parent: Option<Parent>) -> Result<(), RendererError> {
        self.renderer.render(id, parent)
    }

    pub fn render_scene(&mut self, scene: ObjectId) -> Result<(), RendererError> {
        self.renderer.render_scene(scene)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.destroy();
    }
}
