// Copyright 2020 @TwoCookingMice

use super::spectrum::LightIntensity;
use super::tonemap::{ to_display, GammaCorrection, ToneMapping };

use std::ops;
use std::vec::Vec;

/// Row-major radiance buffer, row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    data: Vec<LightIntensity>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = LightIntensity;

    fn index(&self, index: (usize, usize)) -> &LightIntensity {
        assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut LightIntensity {
        assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(LightIntensity::NONE; pixel_number),
               width: width,
               height: height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 3 bytes per pixel, no padding.
    pub fn to_rgb8(&self, tone_mapping: &dyn ToneMapping, gamma: &GammaCorrection) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for light in &self.data {
            bytes.extend_from_slice(&to_display(*light, tone_mapping, gamma).to_rgb8());
        }
        bytes
    }
}

/* Test for Bitmap */
