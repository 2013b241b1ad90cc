// Copyright @yucwang 2026

use super::constants::Float;
use super::spectrum::{ Color, LightIntensity };

pub trait ToneMapping: Send + Sync {
    fn map(&self, light: LightIntensity) -> Color;
}

/// Narkowicz fit of the ACES filmic curve.
#[derive(Debug, Default, Copy, Clone)]
pub struct Aces;

impl Aces {
    const A: Float = 2.51;
    const B: Float = 0.03;
    const C: Float = 2.43;
    const D: Float = 0.59;
    const E: Float = 0.14;

    fn curve(x: Float) -> Float {
        let x = x.max(0.0);
        (((Self::A * x + Self::B) * x) / ((Self::C * x + Self::D) * x + Self::E)).min(1.0)
    }
}

impl ToneMapping for Aces {
    fn map(&self, light: LightIntensity) -> Color {
        Color::clamped(Self::curve(light.r()), Self::curve(light.g()), Self::curve(light.b()))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct GammaCorrection {
    inv_gamma: Float,
}

impl Default for GammaCorrection {
    fn default() -> Self {
        Self::new(2.2)
    }
}

impl GammaCorrection {
    pub fn new(gamma: Float) -> Self {
        Self { inv_gamma: 1.0 / gamma }
    }

    pub fn correct(&self, color: Color) -> Color {
        Color::clamped(color.r().powf(self.inv_gamma),
                       color.g().powf(self.inv_gamma),
                       color.b().powf(self.inv_gamma))
    }
}

/// Tone map then gamma correct a linear radiance estimate.
pub fn to_display(light: LightIntensity, tone_mapping: &dyn ToneMapping, gamma: &GammaCorrection) -> Color {
    gamma.correct(tone_mapping.map(light))
}
