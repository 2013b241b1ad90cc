/* Copyright 2020 @Yuchen Wong */

use nalgebra::{ Point3, UnitQuaternion, Vector2, Vector3 };

pub type Float = f64;

pub type Vector2f = Vector2<Float>;
pub type Vector3f = Vector3<Float>;
pub type Point3f = Point3<Float>;
pub type Rotation = UnitQuaternion<Float>;

pub const EPSILON: Float = 1e-9;
pub const PI: Float = std::f64::consts::PI;
pub const INV_PI: Float = std::f64::consts::FRAC_1_PI;
pub const INV_FOUR_PI: Float = 0.25 * std::f64::consts::FRAC_1_PI;
