//! In-memory backend

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::trace;

use crate::error::DisplayError;
use crate::gfx::surface::Surface;

use super::{EngineEvent, EventSource, Presenter};

/// Counters shared between a [`HeadlessPresenter`] and whoever inspects it
#[derive(Debug, Default)]
pub struct PresenterStats {
    frames: AtomicUsize,
    resizes: AtomicUsize,
    releases: AtomicUsize,
}

impl PresenterStats {
    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }

    pub fn resizes(&self) -> usize {
        self.resizes.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// Presenter that counts frames instead of showing them
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    stats: Arc<PresenterStats>,
    last_size: Option<(u32, u32)>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<PresenterStats> {
        self.stats.clone()
    }

    /// Size of the most recently presented frame
    pub fn last_size(&self) -> Option<(u32, u32)> {
        self.last_size
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, frame: &Surface) -> Result<(), DisplayError> {
        let n = self.stats.frames.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_size = Some(frame.size());
        trace!("headless frame {} ({}x{})", n, frame.width(), frame.height());
        Ok(())
    }

    fn resize(&mut self, _width: u32, _height: u32) {
        self.stats.resizes.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&mut self) {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Event source replaying a fixed script, one batch per poll
///
/// Once the script runs out every poll returns no events.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    batches: VecDeque<Vec<EngineEvent>>,
    polls: usize,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one batch delivered by a single poll
    pub fn then(mut self, batch: impl IntoIterator<Item = EngineEvent>) -> Self {
        self.batches.push_back(batch.into_iter().collect());
        self
    }

    /// Appends `polls` empty batches
    pub fn idle(mut self, polls: usize) -> Self {
        self.batches.extend(std::iter::repeat_with(Vec::new).take(polls));
        self
    }

    /// Quits on the poll after `frames` idle polls
    pub fn quit_after(frames: usize) -> Self {
        Self::new().idle(frames).then([EngineEvent::Quit])
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl EventSource for ScriptedEvents {
    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.polls += 1;
        self.batches.pop_front().unwrap_or_default()
    }
}
