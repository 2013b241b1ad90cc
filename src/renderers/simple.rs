// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::rng::Sampler;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{ Float, Vector2f };
use crate::math::spectrum::LightIntensity;
use indicatif::{ ProgressBar, ProgressStyle };
use log::info;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

pub use super::renderer::Renderer;

const BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    pub seed: u64,
    pub threads: usize,
    pub show_progress: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            threads: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            show_progress: true,
        }
    }
}

struct Block {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    pixels: Vec<LightIntensity>,
}

/// Splits the image into square blocks pulled by a pool of scoped workers.
/// Every pixel owns a sampler seeded from its coordinates, so the result
/// does not depend on the thread count.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    options: RendererOptions,
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, options: RendererOptions) -> Self {
        Self { integrator, options }
    }

    /// Mean of `samples_per_pixel` estimates for pixel `(x, y)`.
    pub fn render_pixel(&self, scene: &Scene, sensor: &dyn Sensor, x: usize, y: usize) -> LightIntensity {
        let spp = self.integrator.samples_per_pixel().max(1);
        let mut sampler = Sampler::new(Sampler::pixel_seed(self.options.seed, x, y));
        let pixel = Vector2f::new(x as Float, y as Float);

        let mut sum = LightIntensity::NONE;
        for _ in 0..spp {
            sum += self.integrator.trace_ray_forward(scene, sensor, pixel, &mut sampler);
        }
        sum / spp as Float
    }

    fn render_block(&self, scene: &Scene, sensor: &dyn Sensor, x0: usize, y0: usize, x1: usize, y1: usize) -> Block {
        let mut pixels = Vec::with_capacity((x1 - x0) * (y1 - y0));
        for y in y0..y1 {
            for x in x0..x1 {
                pixels.push(self.render_pixel(scene, sensor, x, y));
            }
        }
        Block { x0, y0, x1, y1, pixels }
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene, sensor: &dyn Sensor) -> Bitmap {
        let (width, height) = (sensor.width(), sensor.height());
        let mut bitmap = Bitmap::new(width, height);
        if width == 0 || height == 0 {
            return bitmap;
        }

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;
        let thread_count = self.options.threads.clamp(1, total_blocks);

        info!("Rendering {}x{} at {} spp on {} threads.",
              width, height, self.integrator.samples_per_pixel().max(1), thread_count);
        let start = Instant::now();

        let progress = if self.options.show_progress {
            ProgressBar::new(total_blocks as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<Block>();

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = &next_block;
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * BLOCK_SIZE;
                        let y0 = (block_index / blocks_x) * BLOCK_SIZE;
                        let x1 = (x0 + BLOCK_SIZE).min(width);
                        let y1 = (y0 + BLOCK_SIZE).min(height);

                        if tx.send(self.render_block(scene, sensor, x0, y0, x1, y1)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for block in rx.iter() {
                let block_width = block.x1 - block.x0;
                for y in block.y0..block.y1 {
                    for x in block.x0..block.x1 {
                        bitmap[(x, y)] = block.pixels[(x - block.x0) + block_width * (y - block.y0)];
                    }
                }
                progress.inc(1);
            }
        });
        progress.finish_and_clear();

        info!("Render finished in {:.2?}.", start.elapsed());
        bitmap
    }
}
