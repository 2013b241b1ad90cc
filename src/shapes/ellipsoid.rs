// Copyright @yucwang 2026

use crate::core::rng::Sampler;
use crate::core::shape::{ area_to_solid_angle, FiniteShape, Shape };
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, INV_FOUR_PI, PI, Point3f, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use crate::math::warp::sample_uniform_sphere;

const THOMSEN_P: Float = 1.6075;

pub struct Ellipsoid {
    radii: Vector3f,
    to_world: Transform,
}

/// Coefficients of `a t^2 + 2 b t + c = 0` for a ray in the unit-sphere frame.
struct Quadratic {
    a: Float,
    b: Float,
    c: Float,
}

impl Ellipsoid {
    pub fn new(radii: Vector3f, to_world: Transform) -> Self {
        Self { radii, to_world }
    }

    fn quadratic(&self, ray: &Ray3f) -> Quadratic {
        let ray_local = self.to_world.inv_apply_ray(ray);
        let p = ray_local.origin().coords.component_div(&self.radii);
        let d = ray_local.dir().component_div(&self.radii);

        Quadratic { a: d.dot(&d), b: d.dot(&p), c: p.dot(&p) - 1.0 }
    }

    /// Both roots in ascending order, `None` when the ray misses or grazes.
    fn roots(&self, ray: &Ray3f) -> Option<(Float, Float)> {
        let Quadratic { a, b, c } = self.quadratic(ray);
        if a <= 0.0 {
            return None;
        }
        let discriminant = b * b - a * c;
        if !(discriminant > 0.0) {
            return None;
        }
        let sq = discriminant.sqrt();
        Some(((-b - sq) / a, (-b + sq) / a))
    }

    /// Area density of `sample` at `p`: a uniform sphere point stretched by
    /// the radii.
    fn area_pdf(&self, p: &Point3f) -> Float {
        let r = self.radii;
        let u = self.to_world.inv_apply_point(*p).coords.component_div(&r);
        let stretch = Vector3f::new(u.x * r.y * r.z, r.x * u.y * r.z, r.x * r.y * u.z).norm();
        if stretch > 0.0 {
            INV_FOUR_PI / stretch
        } else {
            0.0
        }
    }
}

impl Shape for Ellipsoid {
    fn name(&self) -> &'static str {
        "Ellipsoid"
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float> {
        let (root1, root2) = self.roots(ray)?;
        if root1 > 0.0 {
            Some(root1)
        } else if root2 > 0.0 {
            Some(root2)
        } else {
            None
        }
    }

    // With the origin on the surface one root is ~0 and the roots sum to
    // -2b/a, so the other one is read off without subtracting.
    fn ray_intersection_again(&self, ray: &Ray3f) -> Option<Float> {
        let Quadratic { a, b, .. } = self.quadratic(ray);
        if a <= 0.0 {
            return None;
        }
        let t = -2.0 * b / a;
        if t > 0.0 && t.is_finite() {
            Some(t)
        } else {
            None
        }
    }

    fn outer_normal(&self, p: &Point3f) -> Vector3f {
        let local = self.to_world.inv_apply_point(*p).coords;
        let r2 = self.radii.component_mul(&self.radii);
        let n_local = local.component_div(&r2);
        let len = n_local.norm();
        let n_local = if len > 0.0 { n_local / len } else { n_local };
        self.to_world.apply_vector(n_local)
    }

    fn as_finite(&self) -> Option<&dyn FiniteShape> {
        Some(self)
    }
}

impl FiniteShape for Ellipsoid {
    // Exact bounds of the rotated ellipsoid: the support function along each
    // world axis is |R^T e_i| measured in the radii metric.
    fn bounding_box(&self) -> AABB {
        let rotation = self.to_world.rotation().to_rotation_matrix();
        let m = rotation.matrix();
        let mut half = Vector3f::zeros();
        for i in 0..3 {
            let row = Vector3f::new(m[(i, 0)] * self.radii.x, m[(i, 1)] * self.radii.y, m[(i, 2)] * self.radii.z);
            half[i] = row.norm();
        }
        let center = self.to_world.position();
        AABB::new(center - half, center + half)
    }

    fn surface_area(&self) -> Float {
        let (a, b, c) = (self.radii.x, self.radii.y, self.radii.z);
        let sum = (a * b).powf(THOMSEN_P) + (a * c).powf(THOMSEN_P) + (b * c).powf(THOMSEN_P);
        4.0 * PI * (sum / 3.0).powf(1.0 / THOMSEN_P)
    }

    fn sample(&self, sampler: &mut Sampler) -> Point3f {
        let u = sample_uniform_sphere(&sampler.next_2d());
        self.to_world.apply_point(Point3f::from(u.component_mul(&self.radii)))
    }

    fn pdf_for_ray(&self, ray: &Ray3f) -> Float {
        let (root1, root2) = match self.roots(ray) {
            Some(roots) => roots,
            None => return 0.0,
        };
        let mut pdf = 0.0;
        for t in [root1, root2] {
            if t > 0.0 {
                let p = ray.at(t);
                pdf += area_to_solid_angle(ray, &p, &self.outer_normal(&p), self.area_pdf(&p));
            }
        }
        pdf
    }
}
