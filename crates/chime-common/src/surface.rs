//! Blank drawing surfaces.
//!
//! Widgets draw into surfaces created by a [`GraphicsBackend`]. The
//! [`ImageBackend`] keeps pixels in memory with the `image` crate, which is
//! what offscreen rendering and tests use.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};
use crate::validation::{assert_color, Color};
use crate::value::Value;

/// Flags passed when creating a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceFlags {
    /// Surface carries a per-pixel alpha channel.
    pub per_pixel_alpha: bool,
}

/// Graphics operations needed to build widget surfaces.
pub trait GraphicsBackend {
    /// Backend surface type.
    type Surface;

    /// Create a blank surface.
    fn make_surface(&self, width: u32, height: u32, flags: SurfaceFlags) -> Self::Surface;

    /// Convert a surface to the display's alpha format.
    fn convert_to_alpha(&self, surface: Self::Surface) -> Self::Surface;

    /// Paint every pixel with `color`.
    fn fill_surface(&self, surface: &mut Self::Surface, color: Color);
}

/// In-memory surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSurface {
    /// Pixel data.
    pub image: RgbaImage,
    /// Whether the surface was converted to the alpha format.
    pub converted_alpha: bool,
}

impl ImageSurface {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel at `(x, y)`, if in bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }
}

/// [`GraphicsBackend`] backed by `image::RgbaImage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBackend;

impl GraphicsBackend for ImageBackend {
    type Surface = ImageSurface;

    fn make_surface(&self, width: u32, height: u32, _flags: SurfaceFlags) -> ImageSurface {
        // Pixel storage is always RGBA, so a fresh surface is transparent.
        ImageSurface {
            image: RgbaImage::new(width, height),
            converted_alpha: false,
        }
    }

    fn convert_to_alpha(&self, mut surface: ImageSurface) -> ImageSurface {
        surface.converted_alpha = true;
        surface
    }

    fn fill_surface(&self, surface: &mut ImageSurface, color: Color) {
        let px = Rgba(color.to_rgba());
        for pixel in surface.image.pixels_mut() {
            *pixel = px;
        }
    }
}

/// Create a blank surface, optionally converted to alpha and filled.
///
/// Sizes are truncated to whole pixels. `fill` goes through
/// [`assert_color`] before anything is drawn.
pub fn make_opaque_surface<B: GraphicsBackend>(
    backend: &B,
    width: f64,
    height: f64,
    alpha: bool,
    fill: Option<&Value>,
) -> ValidationResult<B::Surface> {
    let size_error = || ValidationError::SurfaceSize { width, height };
    let max_side = f64::from(u32::MAX);
    if !((0.0..=max_side).contains(&width) && (0.0..=max_side).contains(&height)) {
        return Err(size_error());
    }
    let (w, h) = (width as u32, height as u32);
    // RGBA8 storage must be addressable.
    (w as usize)
        .checked_mul(h as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or_else(size_error)?;

    let fill = fill.map(assert_color).transpose()?;
    let mut surface = backend.make_surface(
        w,
        h,
        SurfaceFlags {
            per_pixel_alpha: true,
        },
    );
    if alpha {
        surface = backend.convert_to_alpha(surface);
    }
    if let Some(color) = fill {
        backend.fill_surface(&mut surface, color);
    }
    debug!("Created {w}x{h} surface (alpha: {alpha})");
    Ok(surface)
}
