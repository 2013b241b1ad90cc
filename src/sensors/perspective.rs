// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{ Float, Point3f, Vector2f, Vector3f };
use crate::math::ray::Ray3f;

/// Pinhole camera with square pixels. The frame vectors are used as given.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    position: Point3f,
    right: Vector3f,
    up: Vector3f,
    forward: Vector3f,
    tan_half_fov_x: Float,
    tan_half_fov_y: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(position: Point3f,
               right: Vector3f,
               up: Vector3f,
               forward: Vector3f,
               fov_x: Float,
               width: usize,
               height: usize) -> Self {
        let tan_half_fov_x = (0.5 * fov_x).tan();
        let tan_half_fov_y = tan_half_fov_x * height as Float / width.max(1) as Float;

        Self { position, right, up, forward, tan_half_fov_x, tan_half_fov_y, width, height }
    }

    pub fn position(&self) -> Point3f {
        self.position
    }

    /// Ray for camera coordinates `(cx, cy)` measured from the bottom-left
    /// corner of the image plane in pixels.
    pub fn ray_through(&self, cx: Float, cy: Float) -> Ray3f {
        let sx = 2.0 * cx / self.width as Float - 1.0;
        let sy = 2.0 * cy / self.height as Float - 1.0;
        let dir = self.right * (sx * self.tan_half_fov_x)
            + self.up * (sy * self.tan_half_fov_y)
            + self.forward;
        Ray3f::new(self.position, dir)
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, pixel: &Vector2f) -> Ray3f {
        self.ray_through(pixel.x, self.height as Float - pixel.y)
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera {}x{}, tan(fov_x / 2) = {:.4}", self.width, self.height, self.tan_half_fov_x)
    }
}
