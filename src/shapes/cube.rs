// Copyright @yucwang 2026

use crate::core::rng::Sampler;
use crate::core::shape::{ area_to_solid_angle, FiniteShape, Shape };
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Point3f, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

/// Oriented box with half-extents `half_size` around its position.
pub struct Cuboid {
    half_size: Vector3f,
    to_world: Transform,
    area: Float,
    inv_area: Float,
}

impl Cuboid {
    pub fn new(half_size: Vector3f, to_world: Transform) -> Self {
        let s = half_size;
        let area = 8.0 * (s.x * s.y + s.y * s.z + s.x * s.z);
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };
        Self { half_size, to_world, area, inv_area }
    }

    /// Entry and exit parameters of the ray against the three slabs, in the
    /// box's local frame. `t_near > t_far` means the ray misses.
    fn slabs(&self, ray: &Ray3f) -> Option<(Float, Float)> {
        let ray_local = self.to_world.inv_apply_ray(ray);
        let o = ray_local.origin();
        let d = ray_local.dir();

        let mut t_near = Float::NEG_INFINITY;
        let mut t_far = Float::INFINITY;
        for axis in 0..3 {
            let size = self.half_size[axis];
            if d[axis] == 0.0 {
                if o[axis].abs() > size {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d[axis];
            let mut t0 = (-size - o[axis]) * inv;
            let mut t1 = (size - o[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
        }

        if t_near.is_finite() && t_far.is_finite() {
            Some((t_near, t_far))
        } else {
            None
        }
    }
}

impl Shape for Cuboid {
    fn name(&self) -> &'static str {
        "Box"
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float> {
        let (t_near, t_far) = self.slabs(ray)?;
        if t_near >= t_far {
            None
        } else if t_near > 0.0 {
            Some(t_near)
        } else if t_far > 0.0 {
            Some(t_far)
        } else {
            None
        }
    }

    // Origin on the surface: one of the two slab roots is ~0. If the interval
    // lies mostly ahead the exit root is the genuine one, otherwise the ray is
    // leaving and only a (negative) entry remains.
    fn ray_intersection_again(&self, ray: &Ray3f) -> Option<Float> {
        let (t_near, t_far) = self.slabs(ray)?;
        if t_near >= t_far {
            return None;
        }
        let t = if t_near + t_far > 0.0 { t_far } else { t_near };
        if t > 0.0 {
            Some(t)
        } else {
            None
        }
    }

    fn outer_normal(&self, p: &Point3f) -> Vector3f {
        let local = self.to_world.inv_apply_point(*p);
        let s = self.half_size;
        let dx = (s.x - local.x.abs()).abs();
        let dy = (s.y - local.y.abs()).abs();
        let dz = (s.z - local.z.abs()).abs();

        let n_local = if dx <= dy && dx <= dz {
            Vector3f::new(sign(local.x), 0.0, 0.0)
        } else if dy <= dz {
            Vector3f::new(0.0, sign(local.y), 0.0)
        } else {
            Vector3f::new(0.0, 0.0, sign(local.z))
        };
        self.to_world.apply_vector(n_local)
    }

    fn as_finite(&self) -> Option<&dyn FiniteShape> {
        Some(self)
    }
}

impl FiniteShape for Cuboid {
    fn bounding_box(&self) -> AABB {
        let s = self.half_size;
        let mut corners = Vec::with_capacity(8);
        for &x in &[-s.x, s.x] {
            for &y in &[-s.y, s.y] {
                for &z in &[-s.z, s.z] {
                    corners.push(self.to_world.apply_point(Point3f::new(x, y, z)));
                }
            }
        }
        AABB::from_points(&corners)
    }

    fn surface_area(&self) -> Float {
        self.area
    }

    fn sample(&self, sampler: &mut Sampler) -> Point3f {
        let s = self.half_size;
        // face pair areas, proportional to the chance of picking that axis
        let weights = [s.y * s.z, s.x * s.z, s.x * s.y];
        let total: Float = weights.iter().sum();

        let target = sampler.next_float() * total;
        let axis = if target < weights[0] {
            0
        } else if target < weights[0] + weights[1] {
            1
        } else {
            2
        };
        let side = if sampler.next_bool() { 1.0 } else { -1.0 };
        let uv = sampler.next_2d();

        let (a1, a2) = ((axis + 1) % 3, (axis + 2) % 3);
        let mut local = Point3f::origin();
        local[axis] = side * s[axis];
        local[a1] = (2.0 * uv.x - 1.0) * s[a1];
        local[a2] = (2.0 * uv.y - 1.0) * s[a2];
        self.to_world.apply_point(local)
    }

    fn pdf_for_ray(&self, ray: &Ray3f) -> Float {
        let (t_near, t_far) = match self.slabs(ray) {
            Some(range) if range.0 < range.1 => range,
            _ => return 0.0,
        };
        let mut pdf = 0.0;
        for t in [t_near, t_far] {
            if t > 0.0 {
                let p = ray.at(t);
                pdf += area_to_solid_angle(ray, &p, &self.outer_normal(&p), self.inv_area);
            }
        }
        pdf
    }
}

fn sign(v: Float) -> Float {
    if v < 0.0 { -1.0 } else { 1.0 }
}
