//! The output surface
//!
//! [`Display`] owns the root surface every top-level object is composited
//! onto, clears it once per frame and hands it to a [`Presenter`] on flip.

use log::{debug, info};

use crate::config::{DisplayFlags, EngineConfig};
use crate::error::DisplayError;
use crate::platform::Presenter;

use super::surface::{Color, Surface};

pub struct Display {
    surface: Surface,
    color: Color,
    flags: DisplayFlags,
    presenter: Option<Box<dyn Presenter>>,
}

impl Display {
    pub fn new(config: &EngineConfig, presenter: Box<dyn Presenter>) -> Self {
        info!(
            "Display {}x{} (double_buffer: {}, hardware: {}, resizable: {})",
            config.width,
            config.height,
            config.flags.double_buffer,
            config.flags.hardware,
            config.flags.resizable
        );
        Self {
            surface: Surface::filled(config.width, config.height, config.color),
            color: config.color,
            flags: config.flags,
            presenter: Some(presenter),
        }
    }

    /// Clears the root surface to `color`, or to the stored colour
    pub fn fill(&mut self, color: Option<Color>) -> Result<(), DisplayError> {
        self.ensure_alive()?;
        self.surface.fill(color.unwrap_or(self.color));
        Ok(())
    }

    /// Presents the root surface
    pub fn flip(&mut self) -> Result<(), DisplayError> {
        let presenter = self.presenter.as_mut().ok_or(DisplayError::Destroyed)?;
        presenter.present(&self.surface)
    }

    /// Per-frame clear. Does not flip.
    pub fn update(&mut self) -> Result<(), DisplayError> {
        self.fill(None)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        let presenter = self.presenter.as_mut().ok_or(DisplayError::Destroyed)?;
        debug!("Display resized to {}x{}", width, height);
        presenter.resize(width, height);
        self.surface.resize(width, height);
        self.surface.fill(self.color);
        Ok(())
    }

    /// Releases the presentation context; later draw calls fail
    pub fn destroy(&mut self) {
        if let Some(mut presenter) = self.presenter.take() {
            presenter.release();
            info!("Display destroyed");
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.presenter.is_none()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn flags(&self) -> DisplayFlags {
        self.flags
    }

    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn ensure_alive(&self) -> Result<(), DisplayError> {
        if self.presenter.is_none() {
            return Err(DisplayError::Destroyed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessPresenter;

    fn display(config: &EngineConfig) -> (Display, std::sync::Arc<crate::platform::PresenterStats>) {
        let presenter = HeadlessPresenter::new();
        let stats = presenter.stats();
        (Display::new(config, Box::new(presenter)), stats)
    }

    #[test]
    fn fill_uses_stored_color_by_default() {
        let config = EngineConfig::default()
            .with_size(4, 4)
            .with_color(Color::rgb(5, 6, 7));
        let (mut display, _) = display(&config);

        display.fill(Some(Color::WHITE)).unwrap();
        assert_eq!(display.surface().pixel(0, 0), Some(Color::WHITE));

        display.update().unwrap();
        assert_eq!(display.surface().pixel(3, 3), Some(Color::rgb(5, 6, 7)));
    }

    #[test]
    fn update_does_not_flip() {
        let config = EngineConfig::default().with_size(2, 2);
        let (mut display, stats) = display(&config);

        display.update().unwrap();
        assert_eq!(stats.frames(), 0);

        display.flip().unwrap();
        assert_eq!(stats.frames(), 1);
    }

    #[test]
    fn destroy_releases_once_and_blocks_drawing() {
        let config = EngineConfig::default().with_size(2, 2);
        let (mut display, stats) = display(&config);

        display.destroy();
        display.destroy();

        assert_eq!(stats.releases(), 1);
        assert!(display.is_destroyed());
        assert_eq!(display.fill(None), Err(DisplayError::Destroyed));
        assert_eq!(display.flip(), Err(DisplayError::Destroyed));
        assert_eq!(display.resize(1, 1), Err(DisplayError::Destroyed));
    }

    #[test]
    fn resize_reallocates_surface() {
        let config = EngineConfig::default().with_size(2, 2);
        let (mut display, stats) = display(&config);

        display.resize(6, 3).unwrap();

        assert_eq!(display.size(), (6, 3));
        assert_eq!(stats.resizes(), 1);
    }
}
