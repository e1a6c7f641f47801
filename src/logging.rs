//! Logger setup
//!
//! The library only logs through the `log` facade. [`init`] installs
//! `env_logger` so `RUST_LOG` controls the output (wgpu and winit logs included).

/// Installs `env_logger`, falling back to `default_filter` when `RUST_LOG` is unset.
///
/// Returns `false` if a logger was already installed.
pub fn init(default_filter: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init()
        .is_ok()
}
