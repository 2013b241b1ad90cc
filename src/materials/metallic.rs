// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInteraction;
use crate::core::material::Material;
use crate::core::scene::TraceContext;
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;
use crate::math::spectrum::LightIntensity;

/// Mirror reflection of `d` about `n`; `n` need not be unit length.
pub fn reflect(d: &Vector3f, n: &Vector3f) -> Vector3f {
    d - n * (2.0 * d.dot(n) / n.norm_squared())
}

/// Perfect mirror tinted by the object color.
pub struct Metallic;

impl Material for Metallic {
    fn name(&self) -> &'static str {
        "Metallic"
    }

    fn shade(&self, incoming: &Ray3f, its: &SurfaceInteraction, ctx: &mut TraceContext) -> LightIntensity {
        let object = ctx.scene().object(its.object());
        let emission = object.emission();
        if its.next_depth() == 0 {
            return emission;
        }

        let reflected = Ray3f::new(its.p(), reflect(&incoming.dir(), &its.normal()));
        emission + ctx.trace(&reflected, its.next_depth(), Some(its.object())) * object.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Sampler;
    use crate::core::scene::{ Scene, SceneObject };
    use crate::core::shape::Shape;
    use crate::materials::diffusive::Diffusive;
    use crate::math::constants::{ Point3f, Rotation };
    use crate::math::spectrum::Color;
    use crate::math::transform::Transform;
    use crate::shapes::cube::Cuboid;
    use crate::shapes::plane::Plane;
    use std::sync::Arc;

    #[test]
    fn test_reflect() {
        let d = Vector3f::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(&d, &Vector3f::new(0.0, 1.0, 0.0)), Vector3f::new(1.0, 1.0, 0.0));
        assert!((reflect(&d, &Vector3f::new(0.0, 3.0, 0.0)) - Vector3f::new(1.0, 1.0, 0.0)).norm() < 1e-12);
        assert_eq!(reflect(&d, &Vector3f::new(0.0, -1.0, 0.0)), Vector3f::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_mirror_shows_tinted_light() {
        let mirror: Arc<dyn Shape> = Arc::new(Plane::new(Vector3f::new(0.0, 1.0, 0.0), 0.0));
        let lamp: Arc<dyn Shape> = Arc::new(Cuboid::new(
            Vector3f::new(0.5, 0.5, 0.5),
            Transform::new(Point3f::new(4.0, 4.2, 0.0), Rotation::identity())));
        let tint = Color::new(0.5, 1.0, 0.0).unwrap();
        let scene = Scene::new(vec![SceneObject::new(mirror, tint, Arc::new(Metallic)),
                                    SceneObject::new(lamp, Color::WHITE, Arc::new(Diffusive))
                                        .with_emission(LightIntensity::new(2.0, 2.0, 2.0))],
                               LightIntensity::new(0.1, 0.1, 0.1));

        let mut sampler = Sampler::new(0);
        let mut ctx = TraceContext::new(&scene, &mut sampler);

        let towards_lamp = Ray3f::new(Point3f::new(-4.0, 4.0, 0.0), Vector3f::new(1.0, -1.0, 0.0));
        assert_eq!(ctx.trace(&towards_lamp, 2, None), LightIntensity::new(1.0, 2.0, 0.0));

        let away = Ray3f::new(Point3f::new(-4.0, 4.0, 0.0), Vector3f::new(-1.0, -1.0, 0.0));
        assert_eq!(ctx.trace(&away, 2, None), LightIntensity::new(0.05, 0.1, 0.0));
        assert_eq!(ctx.trace(&away, 1, None), LightIntensity::NONE);
    }

    #[test]
    fn test_emissive_mirror() {
        let mirror: Arc<dyn Shape> = Arc::new(Plane::new(Vector3f::new(0.0, 1.0, 0.0), 0.0));
        let tint = Color::new(0.5, 1.0, 0.0).unwrap();
        let glow = LightIntensity::new(0.3, 0.3, 0.3);
        let scene = Scene::new(vec![SceneObject::new(mirror, tint, Arc::new(Metallic)).with_emission(glow)],
                               LightIntensity::new(0.1, 0.1, 0.1));
        let mut sampler = Sampler::new(0);
        let mut ctx = TraceContext::new(&scene, &mut sampler);

        let down = Ray3f::new(Point3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(ctx.trace(&down, 1, None), glow);

        let l = ctx.trace(&down, 2, None);
        assert!((l.r() - 0.35).abs() < 1e-12);
        assert!((l.g() - 0.4).abs() < 1e-12);
        assert!((l.b() - 0.3).abs() < 1e-12);
    }
}
