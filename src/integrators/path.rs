// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::rng::Sampler;
use crate::core::scene::{ Scene, TraceContext };
use crate::core::sensor::Sensor;
use crate::math::constants::Vector2f;
use crate::math::spectrum::LightIntensity;

/// Recursive path tracer: every surface hit hands the path to the hit
/// object's material until `max_depth` interactions are spent.
pub struct PathIntegrator {
    pub max_depth: u32,
    pub samples_per_pixel: u32,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, samples_per_pixel: u32) -> Self {
        Self { max_depth, samples_per_pixel }
    }
}

impl Integrator for PathIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, sampler: &mut Sampler) -> LightIntensity {
        let jitter = sampler.next_2d();
        let ray = sensor.sample_ray(&(pixel + jitter));
        let radiance = TraceContext::new(scene, sampler).trace(&ray, self.max_depth, None);
        if radiance.is_finite() {
            radiance
        } else {
            LightIntensity::NONE
        }
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
