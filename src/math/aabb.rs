// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Point3f, Vector3f };
use super::ray::{ Ray3f };

/// Axis-aligned bounding box, `p_min <= p_max` on every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Point3f,
    pub p_max: Point3f
}

impl AABB {
    pub fn new(p_min: Point3f, p_max: Point3f) -> Self {
        let mut min = Point3f::origin();
        let mut max = Point3f::origin();
        for idx in 0..3 {
            min[idx] = p_min[idx].min(p_max[idx]);
            max[idx] = p_max[idx].max(p_min[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    /// Smallest box containing every point. `points` must not be empty.
    pub fn from_points(points: &[Point3f]) -> Self {
        let mut bbox = Self { p_min: points[0], p_max: points[0] };
        for p in &points[1..] {
            bbox.expand_by_point(p);
        }
        bbox
    }

    pub fn center(&self) -> Point3f {
        Point3f::from(0.5 * (self.p_min.coords + self.p_max.coords))
    }

    pub fn expand_by_point(&mut self, p: &Point3f) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(p[idx]);
            self.p_max[idx] = self.p_max[idx].max(p[idx]);
        }
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(other.p_min[idx]);
            self.p_max[idx] = self.p_max[idx].max(other.p_max[idx]);
        }
    }

    pub fn union(&self, other: &AABB) -> AABB {
        let mut result = *self;
        result.expand_by_aabb(other);
        result
    }

    pub fn contains(&self, other: &AABB) -> bool {
        (0..3).all(|idx| self.p_min[idx] <= other.p_min[idx] && other.p_max[idx] <= self.p_max[idx])
    }

    pub fn ray_intersect(&self, ray: &Ray3f) -> bool {
        self.ray_intersect_range(ray).is_some()
    }

    /// Slab test. Returns the parameter interval `[t_near, t_far]` of the ray
    /// inside the box, with `t_near` clamped to zero.
    pub fn ray_intersect_range(&self, ray: &Ray3f) -> Option<(Float, Float)> {
        let o = ray.origin();
        let d = ray.dir();
        let mut t_min: Float = 0.0;
        let mut t_max = Float::INFINITY;

        for idx in 0..3 {
            let dir = d[idx];
            if dir == 0.0 {
                if o[idx] < self.p_min[idx] || o[idx] > self.p_max[idx] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (self.p_min[idx] - o[idx]) * inv;
            let mut t1 = (self.p_max[idx] - o[idx]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Grown by `eps` relative to the largest coordinate magnitude.
    pub fn padded(&self, eps: Float) -> AABB {
        let scale = self.p_min.coords.amax().max(self.p_max.coords.amax()).max(1.0);
        let pad = Vector3f::repeat(eps * scale);
        AABB { p_min: self.p_min - pad, p_max: self.p_max + pad }
    }

    /// Half of the true surface area; only ever compared against itself.
    pub fn surface_area(&self) -> Float {
        let diagnal = self.diagnal();
        diagnal[0] * diagnal[1] + diagnal[0] * diagnal[2] + diagnal[1] * diagnal[2]
    }

    pub fn diagnal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
}

/* Test for AABB */
#[cfg(test)]
mod tests {
    use super::{ AABB, Float, Point3f, Ray3f, Vector3f };
    use rand::rngs::StdRng;
    use rand::{ Rng, SeedableRng };

    fn random_box(rng: &mut StdRng) -> AABB {
        let a = Point3f::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let b = Point3f::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        AABB::new(a, b)
    }

    #[test]
    fn test_aabb_geometry() {
        let min = Point3f::new(1.0, 7.0, 3.0);
        let max = Point3f::new(4.0, 4.0, 4.0);
        let mut bbox: AABB = AABB::new(min, max);
        assert_eq!(bbox.p_min, Point3f::new(1.0, 4.0, 3.0));
        assert_eq!(bbox.p_max, Point3f::new(4.0, 7.0, 4.0));

        let center = bbox.center();
        assert!((center[0] - 2.5).abs() < 1e-12);
        assert!((center[1] - 5.5).abs() < 1e-12);
        assert!((center[2] - 3.5).abs() < 1e-12);

        // 3x3x1 box: 9 + 3 + 3
        assert!((bbox.surface_area() - 15.0).abs() < 1e-12);

        bbox.expand_by_point(&Point3f::new(-1.0, 5.0, 6.0));
        assert_eq!(bbox.p_min[0], -1.0);
        assert_eq!(bbox.p_max[2], 6.0);
    }

    #[test]
    fn test_aabb_union_laws() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_box(&mut rng);
            let b = random_box(&mut rng);
            let c = random_box(&mut rng);

            assert_eq!(a.union(&b), b.union(&a));
            assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));

            let ab = a.union(&b);
            assert!(ab.contains(&a));
            assert!(ab.contains(&b));
        }
    }

    #[test]
    fn test_aabb_intersect() {
        let bbox = AABB::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));

        let inside = Ray3f::new(Point3f::origin(), Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(bbox.ray_intersect(&inside), true);

        let towards = Ray3f::new(Point3f::new(-5.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        let (t0, t1) = bbox.ray_intersect_range(&towards).unwrap();
        assert!((t0 - 4.0).abs() < 1e-12);
        assert!((t1 - 6.0).abs() < 1e-12);

        let away = Ray3f::new(Point3f::new(-5.0, 0.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
        assert_eq!(bbox.ray_intersect(&away), false);

        let parallel_outside = Ray3f::new(Point3f::new(-1.1, 2.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(bbox.ray_intersect(&parallel_outside), false);

        let grazing: Float = 1.0;
        let parallel_on_face = Ray3f::new(Point3f::new(grazing, 5.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(bbox.ray_intersect(&parallel_on_face), true);
    }
}
