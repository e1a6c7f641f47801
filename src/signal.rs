//! Cross-thread stop requests observed by the main loop
//!
//! Both flags are only checked at the top of a main-loop iteration; setting
//! one never cuts a frame short.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, warn};

/// Interrupt handle the process-wide Ctrl-C handler forwards to
static CTRL_C_TARGET: Mutex<Option<InterruptHandle>> = Mutex::new(None);
static CTRL_C_HANDLER: OnceLock<Result<(), String>> = OnceLock::new();

/// Serialises tests that retarget or raise Ctrl-C
#[cfg(test)]
pub(crate) static CTRL_C_TEST_LOCK: Mutex<()> = Mutex::new(());

/// The engine's shutdown flag. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A user interrupt (e.g. Ctrl-C) delivered to the main loop
///
/// [`catch_ctrl_c`] routes SIGINT here; `Engine::run` turns the interrupt
/// into a graceful quit.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Consumes a pending interrupt
    pub(crate) fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Routes Ctrl-C (SIGINT, and console close on Windows) to `handle`
///
/// The process handler is installed on first use and later calls only
/// retarget it, so the most recently registered handle receives the
/// interrupt. Returns `false` if the handler could not be installed, for
/// example because another crate already owns SIGINT.
pub fn catch_ctrl_c(handle: &InterruptHandle) -> bool {
    match CTRL_C_TARGET.lock() {
        Ok(mut target) => *target = Some(handle.clone()),
        Err(poisoned) => *poisoned.into_inner() = Some(handle.clone()),
    }

    let installed = CTRL_C_HANDLER.get_or_init(|| {
        ctrlc::set_handler(|| {
            debug!("Ctrl-C received");
            let target = match CTRL_C_TARGET.lock() {
                Ok(target) => target,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(handle) = target.as_ref() {
                handle.trigger();
            }
        })
        .map_err(|err| err.to_string())
    });

    match installed {
        Ok(()) => true,
        Err(err) => {
            warn!("Ctrl-C handler not installed: {}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_is_shared_between_clones() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();
        assert!(!signal.is_requested());
        clone.request();
        assert!(signal.is_requested());
    }

    #[test]
    fn interrupt_is_consumed_once() {
        let handle = InterruptHandle::new();
        handle.clone().trigger();
        assert!(handle.is_triggered());
        assert!(handle.take());
        assert!(!handle.take());
    }

    #[test]
    fn ctrl_c_target_follows_latest_handle() {
        let _guard = CTRL_C_TEST_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let first = InterruptHandle::new();
        let second = InterruptHandle::new();
        catch_ctrl_c(&first);
        catch_ctrl_c(&second);

        let target = CTRL_C_TARGET.lock().unwrap();
        let target = target.as_ref().unwrap();
        target.trigger();
        assert!(second.take());
        assert!(!first.is_triggered());
    }
}
