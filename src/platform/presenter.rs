//=========================================================================
// Window Presenter
//=========================================================================
//
// Shows the frames rendered on the frame thread inside the OS window.
//
// Architecture:
//   FrameSlot ──read_newer()──> fit_frame (scale + swizzle, CPU)
//       ──queue.write_texture()──> wgpu surface texture ──present()──> window
//
// The surface is configured as a copy destination, so no render pipeline
// or shader is involved. Frames are scaled nearest-neighbour from the
// logical surface size to the window's physical size.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info, warn};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::error::PlatformError;
use crate::core::render::{FrameSlot, PresentedFrame};

//=== PixelLayout =========================================================

/// Byte order of the window surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PixelLayout {
    Rgba,
    Bgra,
}

impl PixelLayout {
    fn of(format: wgpu::TextureFormat) -> Option<Self> {
        match format {
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => Some(Self::Rgba),
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => Some(Self::Bgra),
            _ => None,
        }
    }
}

//=== Presenter ===========================================================

pub(crate) struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    layout: PixelLayout,
    staging: Vec<u8>,
    /// Generation of the last frame shown; 0 forces the next one.
    shown: u64,
}

impl Presenter {
    //--- Construction -----------------------------------------------------

    /// Creates a copy-destination surface for `window`.
    ///
    /// # Errors
    ///
    /// [`PlatformError`] when no adapter can drive the window or the
    /// surface offers no 8-bit RGBA/BGRA copy target.
    pub(crate) fn new(window: Arc<Window>) -> Result<Self, PlatformError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(PlatformError::SurfaceCreation)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(PlatformError::NoAdapter)?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None))
                .map_err(PlatformError::DeviceRequest)?;

        let caps = surface.get_capabilities(&adapter);
        if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(PlatformError::UnsupportedSurface("copy destination usage"));
        }
        let (format, layout) = caps
            .formats
            .iter()
            .find_map(|&format| PixelLayout::of(format).map(|layout| (format, layout)))
            .ok_or(PlatformError::UnsupportedSurface("8-bit RGBA or BGRA format"))?;

        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(PlatformError::UnsupportedSurface("default configuration"))?;
        config.format = format;
        config.usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST;
        config.view_formats = Vec::new();
        surface.configure(&device, &config);

        info!(
            target: "platform",
            "Presenter ready: {:?} {}x{} on {}",
            format,
            config.width,
            config.height,
            adapter.get_info().name
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            layout,
            staging: Vec::new(),
            shown: 0,
        })
    }

    //--- Window Events ----------------------------------------------------

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.shown = 0;
        debug!(target: "platform", "Presenter resized to {}x{}", width, height);
    }

    /// Shows the newest published frame, if the window has not shown it yet.
    pub(crate) fn present_latest(&mut self, frames: &FrameSlot) {
        let (width, height) = (self.config.width, self.config.height);
        let layout = self.layout;
        let staging = &mut self.staging;

        let Some((generation, ())) = frames.read_newer(self.shown, |frame| {
            fit_frame(frame, width, height, layout, staging)
        }) else {
            return;
        };

        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!(target: "platform", "Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                warn!(target: "platform", "Skipping frame {}: {}", generation, e);
                return;
            }
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.staging,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::empty());
        texture.present();
        self.shown = generation;
    }
}

//=== Pixel Conversion ====================================================

/// Scales `frame` to `width`x`height` into `out` in the window's byte
/// order, forcing opaque alpha.
pub(crate) fn fit_frame(
    frame: &PresentedFrame,
    width: u32,
    height: u32,
    layout: PixelLayout,
    out: &mut Vec<u8>,
) {
    out.clear();
    out.reserve(width as usize * height as usize * 4);

    for y in 0..height as u64 {
        let src_y = (y * frame.height as u64 / height as u64) as usize;
        for x in 0..width as u64 {
            let src_x = (x * frame.width as u64 / width as u64) as usize;
            let i = (src_y * frame.width as usize + src_x) * 4;
            let (r, g, b) = (frame.pixels[i], frame.pixels[i + 1], frame.pixels[i + 2]);
            match layout {
                PixelLayout::Rgba => out.extend_from_slice(&[r, g, b, 255]),
                PixelLayout::Bgra => out.extend_from_slice(&[b, g, r, 255]),
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
