//! Task interface for the kiln engine
//!
//! Defines what the task manager needs from work it starts before the main
//! loop begins.

/// Work started once by the [`TaskManager`](super::TaskManager)
pub trait Task {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Start the task
    ///
    /// Called once when the task manager runs, or immediately when the task
    /// is added to a manager that is already running. A failing task is
    /// logged and dropped; it never stops the engine.
    fn start(&mut self) -> anyhow::Result<()>;
}

/// A task built from a name and a closure
pub struct FnTask<F> {
    name: String,
    start: Option<F>,
}

impl<F> FnTask<F>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    pub fn new(name: impl Into<String>, start: F) -> Self {
        Self {
            name: name.into(),
            start: Some(start),
        }
    }
}

impl<F> Task for FnTask<F>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> anyhow::Result<()> {
        match self.start.take() {
            Some(start) => start(),
            None => anyhow::bail!("task '{}' was already started", self.name),
        }
    }
}
