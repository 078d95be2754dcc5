// Copyright @yucwang 2021

use crate::core::computation_node::ComputationNode;
use crate::core::integrator::Integrator;
use crate::core::intersector::SceneIntersector;
use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::renderers::framebuffer::FrameBuffer;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

/// How each pixel gets its camera rays: one ray through the pixel's
/// upper-left corner, or a fixed n-by-n grid of subsamples averaged
/// together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelSampling {
    Single,
    Grid(u32),
}

pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    sampling: PixelSampling,
    buffer: FrameBuffer,
}

impl ComputationNode for SimpleRenderer {
    fn describe(&self) -> String {
        format!("SimpleRenderer: {{ sampling: {:?} }}", self.sampling)
    }
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, sampling: PixelSampling) -> Self {
        Self {
            integrator,
            sampling,
            buffer: FrameBuffer::new(),
        }
    }

    pub fn setup(&mut self, width: usize, height: usize) {
        self.buffer.setup(width, height);
    }

    fn pixel_color(integrator: &dyn Integrator, intersector: &mut SceneIntersector,
                   sampling: PixelSampling, i: usize, j: usize,
                   width: usize, height: usize) -> Vector3f {
        match sampling {
            PixelSampling::Single => {
                let uv = Vector2f::new(i as Float / width as Float,
                                       j as Float / height as Float);
                integrator.trace(intersector, uv)
            }
            PixelSampling::Grid(n) => {
                let n = n.max(1);
                let space = 1.0 / n as Float;
                let mut color = Vector3f::zeros();
                for sx in 0..n {
                    for sy in 0..n {
                        let xa = ((i as Float - 0.5) + space / 2.0
                            + sx as Float * space) / width as Float;
                        let ya = ((j as Float - 0.5) + space / 2.0
                            + sy as Float * space) / height as Float;
                        color += integrator.trace(intersector, Vector2f::new(xa, ya));
                    }
                }
                color / (n * n) as Float
            }
        }
    }

    /// Trace a single pixel on the calling thread, with the memoizing
    /// intersector. Debug entry point; `render` covers whole frames.
    pub fn render_pixel(&mut self, scene: &Scene, i: usize, j: usize) {
        let mut intersector = SceneIntersector::with_cache(scene);
        let color = Self::pixel_color(self.integrator.as_ref(), &mut intersector,
                                      self.sampling, i, j,
                                      self.buffer.width(), self.buffer.height());
        self.buffer.write_pixel(i, j, &color);
    }

    /// Render the whole frame. Worker threads pull rows off a shared
    /// counter and send finished rows back for the single writer.
    pub fn render(&mut self, scene: &Scene) {
        let width = self.buffer.width();
        let height = self.buffer.height();
        if width == 0 || height == 0 {
            return;
        }
        if !scene.is_empty() && !scene.has_bvh() {
            warn!("scene has no BVH; intersections fall back to a linear scan");
        }

        let buffer = &mut self.buffer;
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();
        let sampling = self.sampling;
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        info!("rendering {}x{} on {} threads", width, height, thread_count);

        let progress = ProgressBar::new(height as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_row = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<(usize, Vec<Vector3f>)>();

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_row = Arc::clone(&next_row);
                let tx = tx.clone();
                scope.spawn(move || {
                    let mut intersector = SceneIntersector::new(scene);
                    loop {
                        let j = next_row.fetch_add(1, Ordering::Relaxed);
                        if j >= height {
                            break;
                        }

                        let mut row = vec![Vector3f::zeros(); width];
                        for i in 0..width {
                            row[i] = Self::pixel_color(integrator_ref, &mut intersector,
                                                       sampling, i, j, width, height);
                        }
                        if tx.send((j, row)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..height {
                if let Ok((j, row)) = rx.recv() {
                    for (i, color) in row.iter().enumerate() {
                        buffer.write_pixel(i, j, color);
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }
}
