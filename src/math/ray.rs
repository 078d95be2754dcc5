// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f, FLOAT_MAX};

/// Classification of a ray so that shading can tell primary rays,
/// secondary bounces and shadow probes apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RayKind {
    Visibility,
    Reflection,
    Refraction,
    Shadow,
}

pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    kind: RayKind,
    pub min_t: Float,
    pub max_t: Float,
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f, kind: RayKind) -> Self {
        Self::with_range(o, d, kind, 0.0, FLOAT_MAX)
    }

    pub fn with_range(o: Vector3f, d: Vector3f, kind: RayKind,
                      min_t: Float, max_t: Float) -> Self {
        Self { origin: o, dir: d.normalize(), kind, min_t, max_t }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn kind(&self) -> RayKind {
        self.kind
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }
}

/* Tests for Ray */
