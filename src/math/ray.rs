// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Point3f, Vector3f };

/// A half-line `origin + t * dir`. The direction is kept exactly as given:
/// intersection parameters are measured in units of `dir`, not of length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    origin: Point3f,
    dir: Vector3f,
}

impl Ray3f {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Self { origin: o, dir: d }
    }

    pub fn origin(&self) -> Point3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + self.dir * t
    }

    pub fn normalized(&self) -> Self {
        Self { origin: self.origin, dir: self.dir.normalize() }
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::{ Point3f, Ray3f, Vector3f };

    #[test]
    fn test_ray3f() {
        let o = Point3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let ray = Ray3f::new(o, d);
        assert_eq!(o, ray.origin());
        assert_eq!(d, ray.dir());

        let p = ray.at(2.0);
        assert!((p.x - 2.0).abs() < 1e-12);
        assert!((p.y - 0.0).abs() < 1e-12);
        assert!((p.z - 2.0).abs() < 1e-12);

        let unit = ray.normalized();
        assert!((unit.dir().norm() - 1.0).abs() < 1e-12);
        assert_eq!(unit.origin(), o);
    }
}
