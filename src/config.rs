//! Engine configuration
//!
//! [`EngineConfig`] collects the window and loader settings used when an
//! [`Engine`](crate::Engine) is constructed. Defaults match an 800x600
//! resizable, double-buffered window cleared to black.

use std::path::PathBuf;

use crate::gfx::surface::Color;

/// Presentation hints for the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFlags {
    /// Present with vsync through a swap chain (`Fifo`), else `AutoNoVsync`
    pub double_buffer: bool,
    /// Prefer a high-performance adapter over a low-power one
    pub hardware: bool,
    /// Let the user resize the window
    pub resizable: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            double_buffer: true,
            hardware: true,
            resizable: true,
        }
    }
}

/// Settings for a new engine instance
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Colour the display is cleared to every frame
    pub color: Color,
    pub flags: DisplayFlags,
    /// Base directory for relative asset paths
    pub asset_root: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "kiln".to_string(),
            width: 800,
            height: 600,
            color: Color::BLACK,
            flags: DisplayFlags::default(),
            asset_root: None,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_flags(mut self, flags: DisplayFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(root.into());
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.color, Color::BLACK);
        assert!(config.flags.double_buffer && config.flags.hardware && config.flags.resizable);
        assert!(config.asset_root.is_none());
    }

    #[test]
    fn builders_override_fields() {
        let config = EngineConfig::default()
            .with_title("demo")
            .with_size(320, 240)
            .with_color(Color::rgb(10, 20, 30))
            .with_asset_root("assets")
            .with_flags(DisplayFlags {
                resizable: false,
                ..DisplayFlags::default()
            });

        assert_eq!(config.title, "demo");
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.color, Color::rgb(10, 20, 30));
        assert_eq!(config.asset_root, Some(PathBuf::from("assets")));
        assert!(!config.flags.resizable);
    }
}
