// Copyright @yucwang 2023

use crate::core::interaction::SurfaceInteraction;
use crate::core::material::Material;
use crate::core::scene::TraceContext;
use crate::core::tangent_frame::TangentFrame;
use crate::math::constants::INV_PI;
use crate::math::ray::Ray3f;
use crate::math::spectrum::LightIntensity;
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };

/// Lambertian surface. Each bounce picks, by coin flip, either a cosine
/// sampled direction or a direction towards a point on a light, and divides
/// by the density of the mixture of both strategies.
pub struct Diffusive;

impl Material for Diffusive {
    fn name(&self) -> &'static str {
        "Diffusive"
    }

    fn shade(&self, _incoming: &Ray3f, its: &SurfaceInteraction, ctx: &mut TraceContext) -> LightIntensity {
        let scene = ctx.scene();
        let current = its.object();
        let object = scene.object(current);
        let emission = object.emission();
        if its.next_depth() == 0 {
            return emission;
        }

        let n = its.normal();
        let frame = TangentFrame::from_normal(&n);
        let use_lights = scene.has_light_besides(current);

        let light_point = if use_lights && ctx.sampler().next_bool() {
            scene.sample_light(ctx.sampler())
                .filter(|(light, _)| *light != current)
                .map(|(_, p)| p)
        } else {
            None
        };
        let dir = match light_point {
            Some(p) => p - its.p(),
            None => frame.to_world(&sample_cosine_hemisphere(&ctx.sampler().next_2d())),
        };

        let len = dir.norm();
        if !(len > 0.0) || !len.is_finite() {
            return emission;
        }
        let dir = dir / len;
        let cos = n.dot(&dir);
        if cos <= 0.0 {
            return emission;
        }

        let ray = Ray3f::new(its.p(), dir);
        let cosine_pdf = sample_cosine_hemisphere_pdf(cos);
        let pdf = if use_lights {
            // Picking this very light falls back to cosine sampling.
            let own_weight = scene.light_weight(current);
            0.5 * cosine_pdf * (1.0 + own_weight) + 0.5 * scene.light_pdf(&ray, current)
        } else {
            cosine_pdf
        };
        if !(pdf > 0.0) || !pdf.is_finite() {
            return emission;
        }

        let incoming = ctx.trace(&ray, its.next_depth(), Some(current));
        emission + incoming * object.color() * (cos * INV_PI / pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Sampler;
    use crate::core::scene::{ Scene, SceneObject };
    use crate::core::shape::Shape;
    use crate::math::constants::{ Float, Point3f, Rotation, Vector3f };
    use crate::math::spectrum::Color;
    use crate::math::transform::Transform;
    use crate::shapes::ellipsoid::Ellipsoid;
    use crate::shapes::plane::Plane;
    use std::sync::Arc;

    fn floor(color: Color) -> SceneObject {
        let plane: Arc<dyn Shape> = Arc::new(Plane::new(Vector3f::new(0.0, 1.0, 0.0), 0.0));
        SceneObject::new(plane, color, Arc::new(Diffusive))
    }

    fn average(scene: &Scene, ray: &Ray3f, depth: u32, samples: usize) -> LightIntensity {
        let mut sampler = Sampler::new(42);
        let mut ctx = TraceContext::new(scene, &mut sampler);
        let mut sum = LightIntensity::NONE;
        for _ in 0..samples {
            sum += ctx.trace(ray, depth, None);
        }
        sum / samples as Float
    }

    #[test]
    fn test_uniform_background_is_reproduced_exactly() {
        let color = Color::new(0.5, 0.25, 1.0).unwrap();
        let scene = Scene::new(vec![floor(color)], LightIntensity::new(1.0, 1.0, 1.0));
        let ray = Ray3f::new(Point3f::new(1.0, 1.0, 0.0), Vector3f::new(-1.0, -1.0, 0.0));

        let mut sampler = Sampler::new(3);
        let mut ctx = TraceContext::new(&scene, &mut sampler);
        for _ in 0..100 {
            let l = ctx.trace(&ray, 3, None);
            assert!((l.r() - 0.5).abs() < 1e-12);
            assert!((l.g() - 0.25).abs() < 1e-12);
            assert!((l.b() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sphere_light_irradiance() {
        let (radius, height) = (0.5, 2.0);
        let light: Arc<dyn Shape> = Arc::new(Ellipsoid::new(
            Vector3f::repeat(radius),
            Transform::new(Point3f::new(0.0, height, 0.0), Rotation::identity())));
        let scene = Scene::new(vec![floor(Color::WHITE),
                                    SceneObject::new(light, Color::WHITE, Arc::new(Diffusive))
                                        .with_emission(LightIntensity::new(1.0, 1.0, 1.0))],
                               LightIntensity::NONE);

        let ray = Ray3f::new(Point3f::new(1.0, 1.0, 0.0), Vector3f::new(-1.0, -1.0, 0.0));
        let estimate = average(&scene, &ray, 2, 40_000);
        let expected = (radius / height) * (radius / height);
        for c in [estimate.r(), estimate.g(), estimate.b()] {
            assert!((c - expected).abs() < 0.05 * expected, "{} vs {}", c, expected);
        }
    }

    #[test]
    fn test_emission_without_budget() {
        let scene = Scene::new(vec![floor(Color::WHITE).with_emission(LightIntensity::new(0.0, 2.0, 0.0))],
                               LightIntensity::new(1.0, 1.0, 1.0));
        let ray = Ray3f::new(Point3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(average(&scene, &ray, 1, 4), LightIntensity::new(0.0, 2.0, 0.0));
        let bounced = average(&scene, &ray, 2, 4);
        assert!((bounced.g() - 3.0).abs() < 1e-12);
    }
}
