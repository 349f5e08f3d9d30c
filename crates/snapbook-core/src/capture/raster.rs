//! Off-screen raster surface used to freeze and encode a frame.
//!
//! Drawing follows 2-D canvas semantics: `translate` and `scale` compose onto
//! the current transform, `resize` clears the pixels and resets the
//! transform, and `draw_frame` fills the surface rectangle `(0, 0, w, h)` in
//! user space.

use crate::{CoreError, CoreResult};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use image::{ImageFormat, RgbaImage};
use tracing::{debug, instrument};

/// Axis-aligned affine transform: `x' = sx * x + tx`, `y' = sy * y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Horizontal scale.
    pub sx: f32,
    /// Vertical scale.
    pub sy: f32,
    /// Horizontal offset in device pixels.
    pub tx: f32,
    /// Vertical offset in device pixels.
    pub ty: f32,
}

impl Transform2D {
    /// No scaling, no offset.
    pub const IDENTITY: Self = Self {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// `self` followed by a translation in user space.
    pub fn then_translate(self, tx: f32, ty: f32) -> Self {
        Self {
            tx: self.tx + self.sx * tx,
            ty: self.ty + self.sy * ty,
            ..self
        }
    }

    /// `self` followed by a scale in user space.
    pub fn then_scale(self, sx: f32, sy: f32) -> Self {
        Self {
            sx: self.sx * sx,
            sy: self.sy * sy,
            ..self
        }
    }

    /// Map a user-space point to surface space.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.sx * x + self.tx, self.sy * y + self.ty)
    }

    /// Map a surface-space point back to user space. `None` if degenerate.
    pub fn invert(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.sx == 0.0 || self.sy == 0.0 {
            return None;
        }
        Some(((x - self.tx) / self.sx, (y - self.ty) / self.sy))
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Drawing target that composites a video frame and encodes it losslessly.
pub trait RasterSurface: Send {
    /// Set the pixel size. Clears content and resets the transform.
    fn resize(&mut self, width: u32, height: u32);

    /// Current pixel size.
    fn dimensions(&self) -> (u32, u32);

    /// Compose a translation onto the current transform.
    fn translate(&mut self, tx: f32, ty: f32);

    /// Compose a scale onto the current transform.
    fn scale(&mut self, sx: f32, sy: f32);

    /// Draw `frame` stretched over the user-space rectangle `(0, 0, w, h)`.
    fn draw_frame(&mut self, frame: &RgbaImage);

    /// Encode the current pixels as PNG.
    fn encode_png(&self) -> CoreResult<Vec<u8>>;
}

/// Render `frame` horizontally mirrored on `surface` and encode it.
///
/// The surface is sized to `width` x `height`, then the drawing matrix is
/// flipped (`translate(width, 0)`, `scale(-1, 1)`) so the result matches the
/// mirrored live preview rather than the raw device frame.
#[instrument(skip(surface, frame))]
pub fn render_mirrored<R: RasterSurface + ?Sized>(
    surface: &mut R,
    frame: &RgbaImage,
    width: u32,
    height: u32,
) -> CoreResult<Vec<u8>> {
    surface.resize(width, height);
    surface.translate(width as f32, 0.0);
    surface.scale(-1.0, 1.0);
    surface.draw_frame(frame);
    surface.encode_png()
}

/// [`RasterSurface`] backed by an in-memory RGBA buffer.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    canvas: RgbaImage,
    transform: Transform2D,
}

impl ImageSurface {
    /// Blank 0x0 surface; size it with [`RasterSurface::resize`].
    pub fn new() -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
            transform: Transform2D::IDENTITY,
        }
    }

    /// Transform applied to the next draw.
    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    /// Canvas contents.
    pub fn pixels(&self) -> &RgbaImage {
        &self.canvas
    }
}

impl Default for ImageSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface for ImageSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas = RgbaImage::new(width, height);
        self.transform = Transform2D::IDENTITY;
    }

    fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.transform = self.transform.then_translate(tx, ty);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform.then_scale(sx, sy);
    }

    fn draw_frame(&mut self, frame: &RgbaImage) {
        let (width, height) = self.canvas.dimensions();
        let (frame_w, frame_h) = frame.dimensions();
        if width == 0 || height == 0 || frame_w == 0 || frame_h == 0 {
            return;
        }

        let x_ratio = frame_w as f32 / width as f32;
        let y_ratio = frame_h as f32 / height as f32;

        for (dx, dy, pixel) in self.canvas.enumerate_pixels_mut() {
            // Sample at pixel centres so a 1:1 flip maps column x to w - 1 - x.
            let Some((ux, uy)) = self.transform.invert(dx as f32 + 0.5, dy as f32 + 0.5) else {
                return;
            };
            if ux < 0.0 || uy < 0.0 || ux >= width as f32 || uy >= height as f32 {
                continue;
            }

            let fx = ((ux * x_ratio) as u32).min(frame_w - 1);
            let fy = ((uy * y_ratio) as u32).min(frame_h - 1);
            *pixel = *frame.get_pixel(fx, fy);
        }
    }

    #[track_caller]
    fn encode_png(&self) -> CoreResult<Vec<u8>> {
        let mut bytes = Vec::new();

        self.canvas
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CoreError::EncodingFailed {
                source: Box::new(e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(
            width = self.canvas.width(),
            height = self.canvas.height(),
            bytes = bytes.len(),
            "Surface encoded"
        );

        Ok(bytes)
    }
}
