// Copyright 2020 @TwoCookingMice

use super::constants::{ Point3f, Rotation, Vector3f };
use super::ray::Ray3f;

/// Rigid placement of a primitive: rotate the local frame, then translate it
/// to `position`. Rotation is a unit quaternion applied as `q v q^-1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    position: Point3f,
    rotation: Rotation
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Point3f::origin(),
               rotation: Rotation::identity() }
    }
}

impl Transform {
    pub fn new(position: Point3f, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    pub fn position(&self) -> Point3f {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn apply_point(&self, p: Point3f) -> Point3f {
        self.position + self.rotation.transform_vector(&p.coords)
    }

    pub fn apply_vector(&self, v: Vector3f) -> Vector3f {
        self.rotation.transform_vector(&v)
    }

    pub fn inv_apply_point(&self, p: Point3f) -> Point3f {
        Point3f::from(self.rotation.inverse_transform_vector(&(p - self.position)))
    }

    pub fn inv_apply_vector(&self, v: Vector3f) -> Vector3f {
        self.rotation.inverse_transform_vector(&v)
    }

    pub fn inv_apply_ray(&self, ray: &Ray3f) -> Ray3f {
        Ray3f::new(self.inv_apply_point(ray.origin()), self.inv_apply_vector(ray.dir()))
    }
}
