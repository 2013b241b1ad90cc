// Copyright 2020 @TwoCookingMice

use super::constants::Float;

use std::ops;

/// Unclamped linear radiance triple, not gamma corrected.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightIntensity {
    r: Float,
    g: Float,
    b: Float
}

/// Displayable (or albedo) triple, every channel in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    r: Float,
    g: Float,
    b: Float
}

impl Default for LightIntensity {
    fn default() -> Self {
        Self::NONE
    }
}

impl LightIntensity {
    pub const NONE: LightIntensity = LightIntensity { r: 0.0, g: 0.0, b: 0.0 };

    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b }
    }

    pub fn r(&self) -> Float { self.r }
    pub fn g(&self) -> Float { self.g }
    pub fn b(&self) -> Float { self.b }

    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Sum of channels, used to rank emitters by power.
    pub fn total(&self) -> Float {
        self.r + self.g + self.b
    }
}

impl ops::Add for LightIntensity {
    type Output = LightIntensity;

    fn add(self, rhs: LightIntensity) -> LightIntensity {
        LightIntensity::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl ops::AddAssign for LightIntensity {
    fn add_assign(&mut self, rhs: LightIntensity) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl ops::Mul<Float> for LightIntensity {
    type Output = LightIntensity;

    fn mul(self, rhs: Float) -> LightIntensity {
        LightIntensity::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl ops::Div<Float> for LightIntensity {
    type Output = LightIntensity;

    fn div(self, rhs: Float) -> LightIntensity {
        LightIntensity::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

impl ops::Mul<Color> for LightIntensity {
    type Output = LightIntensity;

    fn mul(self, rhs: Color) -> LightIntensity {
        LightIntensity::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Returns `None` when a channel falls outside `[0, 1]` (or is NaN).
    pub fn new(r: Float, g: Float, b: Float) -> Option<Self> {
        let in_range = |c: Float| (0.0..=1.0).contains(&c);
        if in_range(r) && in_range(g) && in_range(b) {
            Some(Self { r, g, b })
        } else {
            None
        }
    }

    /// Clamps every channel into `[0, 1]`; NaN becomes zero.
    pub fn clamped(r: Float, g: Float, b: Float) -> Self {
        let clamp = |c: Float| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
        Self { r: clamp(r), g: clamp(g), b: clamp(b) }
    }

    pub fn r(&self) -> Float { self.r }
    pub fn g(&self) -> Float { self.g }
    pub fn b(&self) -> Float { self.b }

    /// Round-half-away-from-zero quantization of `255 * channel`.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let quantize = |c: Float| (255.0 * c).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }
}
