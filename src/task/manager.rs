//! Task manager for the kiln engine
//!
//! Holds the tasks registered by the game and starts them when the engine
//! begins running.

use log::{debug, info, warn};

use super::traits::{FnTask, Task};

/// Starts registered tasks before the main loop
#[derive(Default)]
pub struct TaskManager {
    tasks: Vec<Box<dyn Task>>,
    running: bool,
}

impl TaskManager {
    /// Create an empty task manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task
    ///
    /// If the manager is already running the task is started right away.
    pub fn add(&mut self, task: Box<dyn Task>) {
        debug!("Task '{}' registered", task.name());
        if self.running {
            self.start_task(task);
        } else {
            self.tasks.push(task);
        }
    }

    /// Register a closure as a task
    pub fn add_fn<F>(&mut self, name: impl Into<String>, start: F)
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        self.add(Box::new(FnTask::new(name, start)));
    }

    /// Start every registered task in registration order. Runs once.
    pub fn run(&mut self) {
        if self.running {
            return;
        }
        self.running = true;

        let pending = std::mem::take(&mut self.tasks);
        info!("Starting {} task(s)", pending.len());
        for task in pending {
            self.start_task(task);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of tasks that are registered or started successfully
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    fn start_task(&mut self, mut task: Box<dyn Task>) {
        match task.start() {
            Ok(()) => {
                debug!("Task '{}' started", task.name());
                self.tasks.push(task);
            }
            Err(err) => warn!("Task '{}' failed to start, dropping it: {:#}", task.name(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, name: &str) -> impl FnOnce() -> anyhow::Result<()> {
        let log = log.clone();
        let name = name.to_string();
        move || {
            log.borrow_mut().push(name);
            Ok(())
        }
    }

    #[test]
    fn run_starts_tasks_in_order_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tasks = TaskManager::new();
        tasks.add_fn("a", recorder(&log, "a"));
        tasks.add_fn("b", recorder(&log, "b"));

        assert!(log.borrow().is_empty());
        tasks.run();
        tasks.run();

        assert!(tasks.is_running());
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(tasks.task_names(), vec!["a", "b"]);
    }

    #[test]
    fn tasks_added_while_running_start_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tasks = TaskManager::new();
        tasks.run();

        tasks.add_fn("late", recorder(&log, "late"));

        assert_eq!(*log.borrow(), vec!["late"]);
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn failing_tasks_are_dropped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tasks = TaskManager::new();
        tasks.add_fn("broken", || anyhow::bail!("no such device"));
        tasks.add_fn("ok", recorder(&log, "ok"));

        tasks.run();

        assert_eq!(*log.borrow(), vec!["ok"]);
        assert_eq!(tasks.task_names(), vec!["ok"]);
    }

    #[test]
    fn fn_task_starts_once() {
        let mut task = FnTask::new("once", || Ok(()));
        assert!(task.start().is_ok());
        assert!(task.start().is_err());
    }
}
