// Copyright @yucwang 2026

use crate::math::constants::Vector3f;

/// Packed rgb8 output buffer. Rows are stored top to bottom, three bytes
/// per pixel.
pub struct FrameBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self { data: Vec::new(), width: 0, height: 0 }
    }

    /// Size the buffer for a render. Reallocates only when the
    /// dimensions change; the contents are zeroed either way.
    pub fn setup(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.data = vec![0; width * height * 3];
        } else {
            for byte in self.data.iter_mut() {
                *byte = 0;
            }
        }
    }

    /// Store a color already clamped into [0, 1]. Channels quantize by
    /// truncation, so 1.0 maps to 255 and anything below maps down.
    pub fn write_pixel(&mut self, i: usize, j: usize, color: &Vector3f) {
        let base = (i + j * self.width) * 3;
        self.data[base] = (255.0 * color.x) as u8;
        self.data[base + 1] = (255.0 * color.y) as u8;
        self.data[base + 2] = (255.0 * color.z) as u8;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
