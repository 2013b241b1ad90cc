// Copyright @yucwang 2026

use crate::core::shape::Shape;
use crate::math::constants::{ Float, Point3f, Vector3f };
use crate::math::ray::Ray3f;

/// Infinite plane `normal . x = value_at_zero`. Never part of the BVH.
#[derive(Debug, Clone)]
pub struct Plane {
    normal: Vector3f,
    value_at_zero: Float,
}

impl Plane {
    pub fn new(normal: Vector3f, value_at_zero: Float) -> Self {
        let len = normal.norm();
        let (normal, value_at_zero) = if len > 0.0 {
            (normal / len, value_at_zero / len)
        } else {
            (normal, value_at_zero)
        };
        Self { normal, value_at_zero }
    }

    /// Plane with the given normal passing through `point`.
    pub fn through_point(normal: Vector3f, point: &Point3f) -> Self {
        Self::new(normal, normal.dot(&point.coords))
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn value_at_zero(&self) -> Float {
        self.value_at_zero
    }
}

impl Shape for Plane {
    fn name(&self) -> &'static str {
        "Plane"
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float> {
        let denom = ray.dir().dot(&self.normal);
        if denom == 0.0 {
            return None;
        }
        let t = (self.value_at_zero - ray.origin().coords.dot(&self.normal)) / denom;
        if t > 0.0 && t.is_finite() {
            Some(t)
        } else {
            None
        }
    }

    fn ray_intersection_again(&self, _ray: &Ray3f) -> Option<Float> {
        None
    }

    fn outer_normal(&self, _p: &Point3f) -> Vector3f {
        self.normal
    }
}
