// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture: {0}")]
    Load(#[from] image::ImageError),
    #[error("texture has zero extent")]
    Empty,
    #[error("pixel buffer length {got} does not match {width}x{height} rgb")]
    BadBuffer { got: usize, width: usize, height: usize },
}

/// An rgb image sampled bilinearly in surface coordinates. (0, 0) maps
/// to the upper-left texel, (1, 1) to the lower-right; lookups outside
/// the unit square clamp to the border.
pub struct TextureMap {
    width: usize,
    height: usize,
    data: Vec<Float>,
}

impl TextureMap {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgb32f();
        let (width, height) = (img.width() as usize, img.height() as usize);
        Self::from_pixels(width, height, img.into_raw())
    }

    pub fn from_pixels(width: usize, height: usize,
                       data: Vec<Float>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        if data.len() != width * height * 3 {
            return Err(TextureError::BadBuffer { got: data.len(), width, height });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn texel(&self, x: usize, y: usize) -> Vector3f {
        let base = (x + y * self.width) * 3;
        Vector3f::new(self.data[base], self.data[base + 1], self.data[base + 2])
    }

    pub fn sample(&self, uv: &Vector2f) -> Vector3f {
        let x = uv.x.max(0.0).min(1.0) * (self.width - 1) as Float;
        let y = uv.y.max(0.0).min(1.0) * (self.height - 1) as Float;

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as Float;
        let fy = y - y0 as Float;

        let top = self.texel(x0, y0) * (1.0 - fx) + self.texel(x1, y0) * fx;
        let bottom = self.texel(x0, y1) * (1.0 - fx) + self.texel(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}
