// Copyright @yucwang 2023

use crate::core::rng::Sampler;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Point3f, Vector3f };
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    fn name(&self) -> &'static str;

    /// Smallest strictly positive ray parameter of a surface crossing.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float>;

    /// Like `ray_intersection`, for a ray whose origin already lies on this
    /// surface: the root at `t ~ 0` is never reported.
    fn ray_intersection_again(&self, ray: &Ray3f) -> Option<Float>;

    /// Outward normal at a point of the surface, not necessarily unit length.
    fn outer_normal(&self, p: &Point3f) -> Vector3f;

    /// Bounded shapes take part in the BVH and in light sampling.
    fn as_finite(&self) -> Option<&dyn FiniteShape> {
        None
    }
}

pub trait FiniteShape: Shape {
    fn bounding_box(&self) -> AABB;

    fn surface_area(&self) -> Float;

    /// Point on the surface, distributed by the shape's area density.
    fn sample(&self, sampler: &mut Sampler) -> Point3f;

    /// Solid-angle density, seen from `ray.origin()`, of reaching this shape
    /// along `ray.dir()` by sampling a point with `sample`.
    fn pdf_for_ray(&self, ray: &Ray3f) -> Float;
}

/// Converts an area density at `p` into a solid-angle density seen from the
/// origin of `ray`. Grazing hits contribute nothing.
pub fn area_to_solid_angle(ray: &Ray3f, p: &Point3f, normal: &Vector3f, area_pdf: Float) -> Float {
    let n_len = normal.norm();
    if n_len <= 0.0 || !n_len.is_finite() {
        return 0.0;
    }
    let d_len = ray.dir().norm();
    if d_len <= 0.0 {
        return 0.0;
    }
    let cos = (normal.dot(&ray.dir()) / (n_len * d_len)).abs();
    if cos < 1e-12 {
        return 0.0;
    }
    area_pdf * (p - ray.origin()).norm_squared() / cos
}
