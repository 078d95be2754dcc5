// Copyright @yucwang 2026

use super::constants::{Float, Vector3f};

/// Per-channel clamp into the displayable [0, 1] range.
pub fn clamp01(c: &Vector3f) -> Vector3f {
    Vector3f::new(c.x.max(0.0).min(1.0),
                  c.y.max(0.0).min(1.0),
                  c.z.max(0.0).min(1.0))
}

pub fn is_black(c: &Vector3f) -> bool {
    c.norm() == 0.0
}

/// Rec. 601 luma, used when a scalar material parameter is backed by an
/// RGB texture.
pub fn luminance(c: &Vector3f) -> Float {
    0.299 * c.x + 0.587 * c.y + 0.114 * c.z
}
