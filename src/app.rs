//! Winit window and event pump
//!
//! The engine owns its main loop, so instead of handing control to
//! `EventLoop::run_app` the event loop is pumped once per frame with a zero
//! timeout and the collected events are returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::EngineConfig;
use crate::error::DisplayError;
use crate::platform::{EngineEvent, EventSource};

/// Pumps tried while waiting for the platform to hand out the window
const STARTUP_PUMPS: usize = 64;

/// Event source backed by a winit event loop
pub struct WindowEvents {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    pending: Vec<EngineEvent>,
    startup_error: Option<String>,
}

impl WindowEvents {
    /// Creates the event loop and the window described by `config`
    pub fn open(config: &EngineConfig) -> Result<(Self, Arc<Window>), DisplayError> {
        let event_loop =
            EventLoop::new().map_err(|err| DisplayError::platform(err.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.flags.resizable);

        let mut events = Self {
            event_loop,
            app_state: AppState {
                attributes,
                window: None,
                pending: Vec::new(),
                startup_error: None,
            },
        };

        // The window is created from `resumed`, which arrives on an early pump
        for _ in 0..STARTUP_PUMPS {
            if let PumpStatus::Exit(code) = events.pump() {
                return Err(DisplayError::platform(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
            if let Some(err) = events.app_state.startup_error.take() {
                return Err(DisplayError::platform(err));
            }
            if let Some(window) = &events.app_state.window {
                let window = window.clone();
                info!("Window '{}' opened", config.title);
                return Ok((events, window));
            }
        }

        Err(DisplayError::platform("window was never created"))
    }

    fn pump(&mut self) -> PumpStatus {
        self.event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app_state)
    }
}

impl EventSource for WindowEvents {
    fn poll_events(&mut self) -> Vec<EngineEvent> {
        if let PumpStatus::Exit(_) = self.pump() {
            self.app_state.pending.push(EngineEvent::Quit);
        }
        std::mem::take(&mut self.app_state.pending)
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(err) => {
                error!("Failed to create window: {}", err);
                self.startup_error = Some(err.to_string());
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.pending.push(EngineEvent::Quit);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.pending.push(EngineEvent::Resized { width, height });
            }
            _ => (),
        }
    }
}
