// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInteraction;
use crate::core::material::Material;
use crate::core::scene::TraceContext;
use crate::materials::metallic::reflect;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::spectrum::LightIntensity;

/// Schlick's approximation of the reflected fraction for relative index
/// `eta = eta_from / eta_to`.
pub fn schlick(cos_theta: Float, eta: Float) -> Float {
    let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

/// Snell refraction of the unit direction `d` through the unit normal `n`
/// facing it. `None` on total internal reflection.
pub fn refract(d: &Vector3f, n: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_in = (-d.dot(n)).clamp(0.0, 1.0);
    let sin_out = eta * (1.0 - cos_in * cos_in).max(0.0).sqrt();
    if sin_out >= 1.0 {
        return None;
    }
    let cos_out = (1.0 - sin_out * sin_out).sqrt();
    Some(d * eta + n * (eta * cos_in - cos_out))
}

/// Smooth glass-like interface with index of refraction `ior` against vacuum.
pub struct Dielectric {
    ior: Float,
}

impl Dielectric {
    pub fn new(ior: Float) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn name(&self) -> &'static str {
        "Dielectric"
    }

    fn shade(&self, incoming: &Ray3f, its: &SurfaceInteraction, ctx: &mut TraceContext) -> LightIntensity {
        let object = ctx.scene().object(its.object());
        let emission = object.emission();
        if its.next_depth() == 0 {
            return emission;
        }

        let len = incoming.dir().norm();
        if !(len > 0.0) || !len.is_finite() {
            return emission;
        }
        let d = incoming.normalized().dir();
        let n = its.normal();
        let eta = if its.is_front_face() { 1.0 / self.ior } else { self.ior };

        let dir = match refract(&d, &n, eta) {
            Some(refracted) => {
                let cos_in = (-d.dot(&n)).clamp(0.0, 1.0);
                if ctx.sampler().next_float() < schlick(cos_in, eta) {
                    reflect(&d, &n)
                } else {
                    refracted
                }
            }
            None => reflect(&d, &n),
        };

        let ray = Ray3f::new(its.p(), dir);
        emission + ctx.trace(&ray, its.next_depth(), Some(its.object())) * object.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Sampler;
    use crate::core::scene::{ Scene, SceneObject };
    use crate::core::shape::Shape;
    use crate::math::constants::{ Point3f, Rotation };
    use crate::math::spectrum::Color;
    use crate::math::transform::Transform;
    use crate::materials::diffusive::Diffusive;
    use crate::shapes::cube::Cuboid;
    use crate::shapes::ellipsoid::Ellipsoid;
    use crate::shapes::plane::Plane;
    use std::sync::Arc;

    fn lamp(center: Point3f, emission: LightIntensity) -> SceneObject {
        let shape: Arc<dyn Shape> = Arc::new(Cuboid::new(Vector3f::repeat(0.5),
                                                         Transform::new(center, Rotation::identity())));
        SceneObject::new(shape, Color::BLACK, Arc::new(Diffusive)).with_emission(emission)
    }

    fn glass_floor(emission: LightIntensity) -> SceneObject {
        let floor: Arc<dyn Shape> = Arc::new(Plane::new(Vector3f::new(0.0, 1.0, 0.0), 0.0));
        SceneObject::new(floor, Color::WHITE, Arc::new(Dielectric::new(1.5))).with_emission(emission)
    }

    #[test]
    fn test_schlick() {
        assert!((schlick(1.0, 1.0 / 1.5) - 0.04).abs() < 1e-12);
        assert!((schlick(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-12);
        assert_eq!(schlick(0.5, 1.0), 1.0 / 32.0);
    }

    #[test]
    fn test_refract() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let straight = refract(&Vector3f::new(0.0, -1.0, 0.0), &n, 1.0 / 1.5).unwrap();
        assert!((straight - Vector3f::new(0.0, -1.0, 0.0)).norm() < 1e-12);

        let d = Vector3f::new(1.0, -1.0, 0.0).normalize();
        let eta = 1.0 / 1.5;
        let t = refract(&d, &n, eta).unwrap();
        assert!((t.norm() - 1.0).abs() < 1e-12);
        assert!((t.x - eta * d.x).abs() < 1e-12);
        assert!(t.y < 0.0);

        // Leaving glass at 45 degrees is past the critical angle.
        assert!(refract(&d, &n, 1.5).is_none());
    }

    #[test]
    fn test_clear_sphere_passes_background() {
        let ball: Arc<dyn Shape> = Arc::new(Ellipsoid::new(Vector3f::repeat(1.0), Transform::new(Point3f::origin(), Rotation::identity())));
        let scene = Scene::new(vec![SceneObject::new(ball, Color::WHITE, Arc::new(Dielectric::new(1.5)))],
                               LightIntensity::new(0.25, 0.5, 1.0));
        let mut sampler = Sampler::new(9);
        let mut ctx = TraceContext::new(&scene, &mut sampler);

        // Every path ends in the uniform background unless the budget runs out.
        let ray = Ray3f::new(Point3f::new(0.3, 0.2, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        for _ in 0..200 {
            let l = ctx.trace(&ray, 64, None);
            assert!(l == LightIntensity::new(0.25, 0.5, 1.0) || l == LightIntensity::NONE);
        }
    }

    #[test]
    fn test_reflects_with_fresnel_probability() {
        let glow = LightIntensity::new(0.25, 0.0, 0.0);
        let light = LightIntensity::new(1.0, 2.0, 3.0);
        let scene = Scene::new(vec![glass_floor(glow), lamp(Point3f::new(0.0, 10.0, 0.0), light)],
                               LightIntensity::NONE);
        let mut sampler = Sampler::new(17);
        let mut ctx = TraceContext::new(&scene, &mut sampler);
        let down = Ray3f::new(Point3f::new(0.0, 5.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));

        // Out of budget: emission only.
        assert_eq!(ctx.trace(&down, 1, None), glow);

        let n = 20000;
        let mut reflected = 0;
        for _ in 0..n {
            let l = ctx.trace(&down, 2, None);
            if l == glow + light {
                reflected += 1;
            } else {
                assert_eq!(l, glow);
            }
        }
        let expected = schlick(1.0, 1.0 / 1.5);
        let fraction = reflected as Float / n as Float;
        assert!((fraction - expected).abs() < 0.006, "{} vs {}", fraction, expected);
    }

    #[test]
    fn test_total_internal_reflection() {
        let below = LightIntensity::new(1.0, 0.5, 0.25);
        let above = LightIntensity::new(0.0, 0.0, 7.0);
        let s3 = (3.0 as Float).sqrt();
        let scene = Scene::new(vec![glass_floor(LightIntensity::NONE),
                                    lamp(Point3f::new(2.0 * s3, -2.0, 0.0), below),
                                    lamp(Point3f::new(2.0 * s3, 2.0, 0.0), above)],
                               LightIntensity::new(0.0, 1.0, 0.0));
        let mut sampler = Sampler::new(5);
        let mut ctx = TraceContext::new(&scene, &mut sampler);

        // From inside the glass at 60 degrees to the normal, past the critical angle.
        let up = Ray3f::new(Point3f::new(-s3, -1.0, 0.0), Vector3f::new(s3, 1.0, 0.0));
        for _ in 0..500 {
            assert_eq!(ctx.trace(&up, 2, None), below);
        }
    }

    #[test]
    fn test_emissive_glass_sphere() {
        let ball: Arc<dyn Shape> = Arc::new(Ellipsoid::new(Vector3f::repeat(1.0), Transform::new(Point3f::origin(), Rotation::identity())));
        let glow = LightIntensity::new(0.0, 0.5, 0.0);
        let scene = Scene::new(vec![SceneObject::new(ball, Color::WHITE, Arc::new(Dielectric::new(1.5)))
                                        .with_emission(glow)],
                               LightIntensity::new(1.0, 1.0, 1.0));
        let mut sampler = Sampler::new(3);
        let mut ctx = TraceContext::new(&scene, &mut sampler);

        let ray = Ray3f::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        for _ in 0..50 {
            assert_eq!(ctx.trace(&ray, 1, None), glow);
            assert!(ctx.trace(&ray, 8, None).g() >= 0.5);
        }
    }
}
