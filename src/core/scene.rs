// Copyright @yucwang 2026

use crate::core::alias::AliasMethod;
use crate::core::bvh::BVH;
use crate::core::interaction::SurfaceInteraction;
use crate::core::material::Material;
use crate::core::rng::Sampler;
use crate::core::shape::{ FiniteShape, Shape };
use crate::math::constants::{ Float, Point3f };
use crate::math::ray::Ray3f;
use crate::math::spectrum::{ Color, LightIntensity };
use log::{ debug, warn };
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub color: Color,
    pub material: Arc<dyn Material>,
    pub emission: LightIntensity,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, color: Color, material: Arc<dyn Material>) -> Self {
        Self { shape, color, material, emission: LightIntensity::NONE }
    }

    pub fn with_emission(mut self, emission: LightIntensity) -> Self {
        self.emission = emission;
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn emission(&self) -> LightIntensity {
        self.emission
    }

    /// Radiant power used to weight light selection.
    pub fn power(&self) -> Float {
        match self.shape.as_finite() {
            Some(finite) => finite.surface_area() * self.emission.total(),
            None => 0.0,
        }
    }
}

/// Frozen scene: objects, the BVH over the bounded ones and the light table.
pub struct Scene {
    background: LightIntensity,
    objects: Vec<SceneObject>,
    finite: Vec<usize>,
    infinite: Vec<usize>,
    bvh: BVH,
    lights: Vec<usize>,
    light_slot: Vec<Option<usize>>,
    light_table: Option<AliasMethod>,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>, background: LightIntensity) -> Self {
        let mut finite = Vec::new();
        let mut infinite = Vec::new();
        let mut prim_bounds = Vec::new();
        for (idx, object) in objects.iter().enumerate() {
            match object.shape.as_finite() {
                Some(shape) => {
                    finite.push(idx);
                    prim_bounds.push(shape.bounding_box());
                }
                None => infinite.push(idx),
            }
        }

        let bvh = BVH::new(prim_bounds);
        debug!("BVH built: {} nodes, {} leaves, depth {}", bvh.node_count(), bvh.leaf_count(), bvh.depth());

        let mut lights = Vec::new();
        let mut powers = Vec::new();
        let mut light_slot = vec![None; objects.len()];
        for (idx, object) in objects.iter().enumerate() {
            if object.emission.is_black() {
                continue;
            }
            let power = object.power();
            if power > 0.0 && power.is_finite() {
                light_slot[idx] = Some(lights.len());
                lights.push(idx);
                powers.push(power);
            } else {
                warn!("emissive {} (object {}) has no finite power, not used for light sampling",
                      object.shape.name(), idx);
            }
        }

        let light_table = AliasMethod::new(&powers);
        debug!("Light table built over {} lights", lights.len());

        Self { background, objects, finite, infinite, bvh, lights, light_slot, light_table }
    }

    pub fn background(&self) -> LightIntensity {
        self.background
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, idx: usize) -> &SceneObject {
        &self.objects[idx]
    }

    /// Objects that light sampling may pick.
    pub fn lights(&self) -> &[usize] {
        &self.lights
    }

    /// Closest hit `(object index, t)`. `just_left` is the object the ray
    /// starts on; it is tested with `ray_intersection_again`.
    pub fn nearest(&self, ray: &Ray3f, just_left: Option<usize>) -> Option<(usize, Float)> {
        let hit_object = |idx: usize, ray: &Ray3f| {
            let shape = &self.objects[idx].shape;
            if just_left == Some(idx) {
                shape.ray_intersection_again(ray)
            } else {
                shape.ray_intersection(ray)
            }
        };

        let mut closest = self.bvh
            .ray_intersection(ray, |prim_idx, ray| hit_object(self.finite[prim_idx], ray))
            .map(|(prim_idx, t)| (self.finite[prim_idx], t));

        for &idx in &self.infinite {
            if let Some(t) = hit_object(idx, ray) {
                if closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((idx, t));
                }
            }
        }

        closest.filter(|(_, t)| t.is_finite())
    }

    /// Probability that light selection picks `idx`, zero for non-lights.
    pub fn light_weight(&self, idx: usize) -> Float {
        match (&self.light_table, self.light_slot.get(idx).copied().flatten()) {
            (Some(table), Some(slot)) => table.weight(slot),
            _ => 0.0,
        }
    }

    /// True when some light other than `exclude` can be sampled.
    pub fn has_light_besides(&self, exclude: usize) -> bool {
        self.lights.iter().any(|&idx| idx != exclude)
    }

    /// Picks a light by power and a point on it. Returns `None` for an empty
    /// light set; the picked light may be `exclude`'s own object.
    pub fn sample_light(&self, sampler: &mut Sampler) -> Option<(usize, Point3f)> {
        let table = self.light_table.as_ref()?;
        let idx = self.lights[table.sample(sampler)];
        let shape = self.objects[idx].shape.as_finite()?;
        Some((idx, shape.sample(sampler)))
    }

    /// Solid-angle density of reaching `ray.dir()` through `sample_light`,
    /// leaving out the light `exclude`.
    pub fn light_pdf(&self, ray: &Ray3f, exclude: usize) -> Float {
        let mut pdf = 0.0;
        for &idx in &self.lights {
            if idx == exclude {
                continue;
            }
            if let Some(shape) = self.objects[idx].shape.as_finite() {
                pdf += self.light_weight(idx) * shape.pdf_for_ray(ray);
            }
        }
        pdf
    }
}

/// Per-task tracing state: the shared scene and the task's own sampler.
pub struct TraceContext<'a> {
    scene: &'a Scene,
    sampler: &'a mut Sampler,
}

impl<'a> TraceContext<'a> {
    pub fn new(scene: &'a Scene, sampler: &'a mut Sampler) -> Self {
        Self { scene, sampler }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn sampler(&mut self) -> &mut Sampler {
        &mut *self.sampler
    }

    /// Radiance arriving at `ray.origin()` from `ray.dir()` with a budget of
    /// `depth` surface interactions.
    pub fn trace(&mut self, ray: &Ray3f, depth: u32, just_left: Option<usize>) -> LightIntensity {
        if depth == 0 {
            return LightIntensity::NONE;
        }

        let scene = self.scene;
        let (idx, t) = match scene.nearest(ray, just_left) {
            Some(hit) => hit,
            None => return scene.background(),
        };

        let object = scene.object(idx);
        let p = ray.at(t);
        let outer_normal = object.shape.outer_normal(&p);
        let n_len = outer_normal.norm();
        if !(n_len > 0.0) || !n_len.is_finite() {
            return object.emission;
        }

        let its = SurfaceInteraction::new(idx, p, outer_normal / n_len, &ray.dir(), depth);
        object.material.shade(ray, &its, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::diffusive::Diffusive;
    use crate::math::constants::{ Rotation, Vector3f };
    use crate::math::transform::Transform;
    use crate::shapes::cube::Cuboid;
    use crate::shapes::ellipsoid::Ellipsoid;
    use crate::shapes::plane::Plane;

    fn sphere(center: Point3f, radius: Float) -> Arc<dyn Shape> {
        Arc::new(Ellipsoid::new(Vector3f::repeat(radius), Transform::new(center, Rotation::identity())))
    }

    fn object(shape: Arc<dyn Shape>) -> SceneObject {
        SceneObject::new(shape, Color::WHITE, Arc::new(Diffusive))
    }

    fn test_scene() -> Scene {
        let floor = Arc::new(Plane::through_point(Vector3f::new(0.0, 1.0, 0.0), &Point3f::new(0.0, -2.0, 0.0)));
        let light = Arc::new(Cuboid::new(Vector3f::new(1.0, 0.01, 1.0),
                                         Transform::new(Point3f::new(0.0, 5.0, 0.0), Rotation::identity())));
        Scene::new(vec![object(floor),
                        object(sphere(Point3f::origin(), 1.0)),
                        object(light).with_emission(LightIntensity::new(4.0, 4.0, 4.0)),
                        object(sphere(Point3f::new(5.0, 0.0, 0.0), 1.0)).with_emission(LightIntensity::new(1.0, 0.0, 0.0))],
                   LightIntensity::new(0.1, 0.2, 0.3))
    }

    #[test]
    fn test_nearest_mixes_bvh_and_planes() {
        let scene = test_scene();

        let down = Ray3f::new(Point3f::new(0.0, 3.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(scene.nearest(&down, None), Some((1, 2.0)));

        let beside = Ray3f::new(Point3f::new(2.5, 3.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(scene.nearest(&beside, None), Some((0, 5.0)));

        let up = Ray3f::new(Point3f::new(2.5, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(scene.nearest(&up, None), None);
    }

    #[test]
    fn test_just_left_object_uses_reintersection() {
        let scene = test_scene();

        let inward = Ray3f::new(Point3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        let (idx, t) = scene.nearest(&inward, Some(1)).unwrap();
        assert_eq!(idx, 1);
        assert!((t - 2.0).abs() < 1e-12);

        // Leaving the sphere outward skips it and reaches the light above.
        let outward = Ray3f::new(Point3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        let (idx, t) = scene.nearest(&outward, Some(1)).unwrap();
        assert_eq!(idx, 2);
        assert!((t - 3.99).abs() < 1e-9);
    }

    #[test]
    fn test_light_table() {
        let scene = test_scene();
        assert_eq!(scene.lights(), &[2, 3]);
        assert_eq!(scene.light_weight(0), 0.0);

        let box_power = scene.object(2).power();
        let sphere_power = scene.object(3).power();
        assert!((box_power - 8.0 * (0.01 + 0.01 + 1.0) * 12.0).abs() < 1e-9);
        let expected = box_power / (box_power + sphere_power);
        assert!((scene.light_weight(2) - expected).abs() < 1e-12);

        assert!(scene.has_light_besides(2));
        let mut sampler = Sampler::new(11);
        for _ in 0..100 {
            let (idx, p) = scene.sample_light(&mut sampler).unwrap();
            assert!(idx == 2 || idx == 3);
            if idx == 2 {
                assert!((p.y - 5.0).abs() <= 0.01 + 1e-12);
            }
        }

        // The light pdf ignores the excluded light.
        let ray = Ray3f::new(Point3f::origin(), Vector3f::new(0.0, 1.0, 0.0));
        assert!(scene.light_pdf(&ray, 0) > 0.0);
        assert_eq!(scene.light_pdf(&ray, 2), 0.0);
    }

    #[test]
    fn test_trace_background_and_depth() {
        let scene = test_scene();
        let mut sampler = Sampler::new(1);
        let mut ctx = TraceContext::new(&scene, &mut sampler);

        let up = Ray3f::new(Point3f::new(2.5, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(ctx.trace(&up, 3, None), LightIntensity::new(0.1, 0.2, 0.3));
        assert_eq!(ctx.trace(&up, 0, None), LightIntensity::NONE);

        // With a budget of one only the emission of the hit survives.
        let at_light = Ray3f::new(Point3f::new(0.0, 8.0, 0.0), Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(ctx.trace(&at_light, 1, None), LightIntensity::new(4.0, 4.0, 4.0));
    }
}
