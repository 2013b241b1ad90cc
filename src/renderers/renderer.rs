// Copyright @yucwang 2021

use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;

pub trait Renderer {
    /// Averaged radiance per pixel, row 0 at the top.
    fn render(&self, scene: &Scene, sensor: &dyn Sensor) -> Bitmap;
}
