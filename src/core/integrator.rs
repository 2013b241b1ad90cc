// Copyright @yucwang 2026

use crate::core::rng::Sampler;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::Vector2f;
use crate::math::spectrum::LightIntensity;

pub trait Integrator: Sync {
    /// One radiance estimate for the raster position `pixel`.
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, sampler: &mut Sampler) -> LightIntensity;
    fn samples_per_pixel(&self) -> u32;
}
