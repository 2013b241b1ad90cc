/* Copyright 2020 @TwoCookingMice */

use std::fs::File;
use std::io::{ BufWriter, Write };
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageWriteError {
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("expected {expected} bytes for a {width}x{height} RGB image, got {found}")]
    BufferSize { width: usize, height: usize, expected: usize, found: usize },
}

fn check_buffer(width: usize, height: usize, bytes: &[u8]) -> Result<(), ImageWriteError> {
    let expected = width * height * 3;
    if bytes.len() != expected {
        return Err(ImageWriteError::BufferSize { width, height, expected, found: bytes.len() });
    }
    Ok(())
}

/// Binary PPM: `P6` header followed by row-major RGB bytes, top row first.
pub fn encode_ppm<W: Write>(out: &mut W, width: usize, height: usize, bytes: &[u8]) -> Result<(), ImageWriteError> {
    check_buffer(width, height, bytes)?;
    write!(out, "P6\n{} {}\n255\n", width, height)?;
    out.write_all(bytes)?;
    Ok(())
}

pub fn write_ppm<P: AsRef<Path>>(path: P, width: usize, height: usize, bytes: &[u8]) -> Result<(), ImageWriteError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    encode_ppm(&mut writer, width, height, bytes)?;
    writer.flush()?;
    Ok(())
}

/// Writes PPM for `.ppm` or extension-less paths, and lets the `image` crate
/// pick the encoder for anything else.
pub fn write_image<P: AsRef<Path>>(path: P, width: usize, height: usize, bytes: &[u8]) -> Result<(), ImageWriteError> {
    let path = path.as_ref();
    log::info!("Writing {}x{} image to {}.", width, height, path.display());

    let is_ppm = path.extension()
        .map_or(true, |ext| ext.eq_ignore_ascii_case("ppm"));
    if is_ppm {
        return write_ppm(path, width, height, bytes);
    }

    check_buffer(width, height, bytes)?;
    image::save_buffer(path, bytes, width as u32, height as u32, image::ColorType::Rgb8)?;
    Ok(())
}
