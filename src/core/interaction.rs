// Copyright @yucwang 2023

use crate::math::constants::{ Point3f, Vector3f };

/// Local environment of a ray hit, handed to the hit object's material.
#[derive(Debug, Copy, Clone)]
pub struct SurfaceInteraction {
    object: usize,
    p: Point3f,
    outer_normal: Vector3f,
    normal: Vector3f,
    depth: u32,
}

impl SurfaceInteraction {
    /// `outer_normal` must be unit length. `depth` is the recursion budget
    /// the hit was traced with.
    pub fn new(object: usize, p: Point3f, outer_normal: Vector3f, incoming: &Vector3f, depth: u32) -> Self {
        let normal = if outer_normal.dot(incoming) > 0.0 { -outer_normal } else { outer_normal };
        Self { object, p, outer_normal, normal, depth }
    }

    /// Index of the hit object in the scene.
    pub fn object(&self) -> usize {
        self.object
    }

    pub fn p(&self) -> Point3f {
        self.p
    }

    /// Unit normal on the side the ray came from.
    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    /// True when the ray hit the surface from outside.
    pub fn is_front_face(&self) -> bool {
        self.normal == self.outer_normal
    }

    /// Budget left for a continuation ray.
    pub fn next_depth(&self) -> u32 {
        self.depth.saturating_sub(1)
    }
}
