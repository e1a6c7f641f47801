//! WGPU presentation backend
//!
//! Uploads the composited root surface straight into the swap-chain texture
//! every frame. All drawing happens on the CPU; wgpu only puts pixels on screen.

use std::sync::Arc;

use log::{debug, info, warn};
use winit::window::Window;

use crate::config::DisplayFlags;
use crate::error::DisplayError;
use crate::gfx::surface::Surface;
use crate::platform::Presenter;

/// Presents CPU surfaces into a window through wgpu
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    // Surface wants BGRA byte order
    swizzle: bool,
    staging: Vec<u8>,
}

impl RenderEngine {
    /// Creates a render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for presentation
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `flags` - Present mode and adapter preferences
    ///
    /// # Errors
    /// Fails if no adapter, device or copyable 8-bit surface format is available
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        flags: DisplayFlags,
    ) -> Result<RenderEngine, DisplayError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|err| DisplayError::platform(err.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: if flags.hardware {
                    wgpu::PowerPreference::HighPerformance
                } else {
                    wgpu::PowerPreference::LowPower
                },
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| DisplayError::platform(format!("no adapter: {err}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("kiln device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|err| DisplayError::platform(format!("no device: {err}")))?;

        let capabilities = surface.get_capabilities(&adapter);
        if !capabilities.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(DisplayError::surface("surface textures cannot be copied into"));
        }

        // Unorm formats first so bytes land on screen unchanged
        let format = [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]
        .into_iter()
        .find(|format| capabilities.formats.contains(format))
        .ok_or_else(|| DisplayError::surface("no 8-bit RGBA surface format"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if flags.double_buffer {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        info!(
            "Render engine ready: {} ({:?}, {:?})",
            adapter.get_info().name,
            format,
            config.present_mode
        );

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            swizzle: matches!(
                format,
                wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
            ),
            staging: Vec::new(),
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Copies the visible part of `frame` into the staging buffer in surface byte order
    fn stage(&mut self, frame: &Surface, width: u32, height: u32) {
        let row = (width * 4) as usize;
        let stride = (frame.width() * 4) as usize;
        let raw = frame.as_raw();

        self.staging.clear();
        self.staging.reserve(row * height as usize);
        for y in 0..height as usize {
            let start = y * stride;
            self.staging.extend_from_slice(&raw[start..start + row]);
        }

        if self.swizzle {
            for px in self.staging.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
    }
}

impl Presenter for RenderEngine {
    fn present(&mut self, frame: &Surface) -> Result<(), DisplayError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(err) => return Err(DisplayError::surface(err.to_string())),
        };

        let width = frame.width().min(self.config.width);
        let height = frame.height().min(self.config.height);
        if width > 0 && height > 0 {
            self.stage(frame, width, height);
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &output.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &self.staging,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
            self.queue.submit(std::iter::empty());
        }

        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn release(&mut self) {
        self.staging = Vec::new();
        info!("Render engine released");
    }
}
