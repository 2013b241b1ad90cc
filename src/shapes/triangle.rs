// Copyright @yucwang 2023

use crate::core::rng::Sampler;
use crate::core::shape::{ area_to_solid_angle, FiniteShape, Shape };
use crate::math::aabb::AABB;
use crate::math::constants::{ EPSILON, Float, Point3f, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use crate::math::warp::square_to_triangle;

pub struct Triangle {
    p0: Point3f,
    p1: Point3f,
    p2: Point3f,
    normal: Vector3f,
}

impl Triangle {
    pub fn new(p0: Point3f, p1: Point3f, p2: Point3f) -> Self {
        let normal = (p1 - p0).cross(&(p2 - p0));
        Triangle { p0, p1, p2, normal }
    }

    pub fn with_transform(p0: Point3f, p1: Point3f, p2: Point3f, to_world: &Transform) -> Self {
        Self::new(to_world.apply_point(p0), to_world.apply_point(p1), to_world.apply_point(p2))
    }

    /// Möller-Trumbore. Returns `(t, u, v)` for the hit `p0 + u e1 + v e2`.
    fn solve(&self, ray: &Ray3f) -> Option<(Float, Float, Float)> {
        let edge1 = self.p1 - self.p0;
        let edge2 = self.p2 - self.p0;
        let dir = ray.dir();

        let p_vec = dir.cross(&edge2);
        let det = edge1.dot(&p_vec);
        let scale = edge1.norm() * edge2.norm() * dir.norm();
        if !(det.abs() > EPSILON * scale) {
            return None;
        }
        let inv_det = 1.0 / det;

        let t_vec = ray.origin() - self.p0;
        let u = t_vec.dot(&p_vec) * inv_det;
        if !(u > 0.0) || u >= 1.0 {
            return None;
        }

        let q_vec = t_vec.cross(&edge1);
        let v = dir.dot(&q_vec) * inv_det;
        if !(v > 0.0) || u + v >= 1.0 {
            return None;
        }

        let t = edge2.dot(&q_vec) * inv_det;
        if t > 0.0 && t.is_finite() {
            Some((t, u, v))
        } else {
            None
        }
    }
}

impl Shape for Triangle {
    fn name(&self) -> &'static str {
        "Triangle"
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float> {
        self.solve(ray).map(|(t, _, _)| t)
    }

    fn ray_intersection_again(&self, _ray: &Ray3f) -> Option<Float> {
        None
    }

    fn outer_normal(&self, _p: &Point3f) -> Vector3f {
        self.normal
    }

    fn as_finite(&self) -> Option<&dyn FiniteShape> {
        Some(self)
    }
}

impl FiniteShape for Triangle {
    fn bounding_box(&self) -> AABB {
        AABB::from_points(&[self.p0, self.p1, self.p2])
    }

    fn surface_area(&self) -> Float {
        0.5 * self.normal.norm()
    }

    fn sample(&self, sampler: &mut Sampler) -> Point3f {
        let bary = square_to_triangle(&sampler.next_2d());
        Point3f::from(self.p0.coords * bary.x + self.p1.coords * bary.y + self.p2.coords * bary.z)
    }

    fn pdf_for_ray(&self, ray: &Ray3f) -> Float {
        let area = self.surface_area();
        if area <= 0.0 {
            return 0.0;
        }
        match self.solve(ray) {
            Some((t, _, _)) => area_to_solid_angle(ray, &ray.at(t), &self.normal, 1.0 / area),
            None => 0.0,
        }
    }
}
