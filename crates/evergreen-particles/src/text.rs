//! Text point cloud: glyph rasterization seam, sampler cache and point allocator
//!
//! The phrase is rasterized onto a fixed-size canvas, lit pixels are sampled
//! on a regular grid and mapped into world space as a thin plate. The sample
//! order is shuffled once so particle ids carry no glyph structure. Requests
//! beyond the natural sample count are served with halo points pushed behind
//! the text plane.

use crate::rand::ParticleRng;
use evergreen_core::{DeviceClass, Vec3};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, read-only text sample pool
pub type TextPool = Arc<[Vec3]>;

/// Canvas layout and world mapping for the text formation
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub lines: Vec<String>,
    /// Nominal font size in pixels
    pub font_px: f32,
    /// Distance between line centers in pixels
    pub line_spacing: f32,
    /// Extra downward shift of the first line in pixels
    pub first_line_nudge: f32,
    /// Sampling grid step in pixels
    pub step: usize,
    /// World units per pixel
    pub world_scale: f32,
    /// World-space lift applied to every point
    pub lift: f32,
    pub xy_jitter: f32,
    pub depth_jitter: f32,
    /// Maximum push behind the text plane for halo points
    pub halo_depth: f32,
    pub halo_spread: f32,
}

impl TextLayout {
    pub fn for_device(device: DeviceClass) -> Self {
        Self {
            canvas_width: 1024,
            canvas_height: 512,
            lines: vec!["Merry".to_string(), "Christmas".to_string()],
            font_px: device.pick(160.0, 130.0),
            line_spacing: device.pick(130.0, 150.0),
            first_line_nudge: 20.0,
            step: 4,
            world_scale: device.pick(0.025, 0.04),
            lift: 6.5,
            xy_jitter: 0.04,
            depth_jitter: 0.2,
            halo_depth: 2.0,
            halo_spread: 0.5,
        }
    }

    /// Vertical pixel center of each line
    pub fn line_centers(&self) -> Vec<f32> {
        let mid = self.canvas_height as f32 / 2.0;
        match self.lines.len() {
            0 => Vec::new(),
            1 => vec![mid],
            n => {
                // First line sits half a spacing above the middle, the rest follow
                let top = mid - self.line_spacing / 2.0 + self.first_line_nudge;
                let mut centers = vec![top];
                for i in 1..n {
                    centers.push(mid + self.line_spacing / 2.0 + (i - 1) as f32 * self.line_spacing);
                }
                centers
            }
        }
    }
}

/// Lit-pixel coverage of a rasterized phrase
#[derive(Debug, Clone)]
pub struct Coverage {
    pub width: usize,
    pub height: usize,
    lit: Vec<bool>,
}

impl Coverage {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            lit: vec![false; width * height],
        }
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.lit[y * self.width + x]
    }

    /// Light every pixel of the rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let xa = x0.max(0.0).floor() as usize;
        let ya = y0.max(0.0).floor() as usize;
        let xb = (x1.max(0.0).ceil() as usize).min(self.width);
        let yb = (y1.max(0.0).ceil() as usize).min(self.height);
        for y in ya..yb {
            for x in xa..xb {
                self.lit[y * self.width + x] = true;
            }
        }
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|&&l| l).count()
    }
}

/// Rasterizes the layout's lines into pixel coverage.
///
/// This is the seam to a real font renderer; `BlockFont` is the built-in one.
pub trait GlyphMask {
    fn rasterize(&self, layout: &TextLayout) -> Coverage;
}

/// 5x7 uppercase bitmap font scaled to the layout's font size
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    const COLUMNS: usize = 5;
    const ROWS: usize = 7;
    /// Cap height as a fraction of the nominal font size
    const CAP_RATIO: f32 = 0.7;

    fn glyph(c: char) -> Option<[u8; 7]> {
        let rows = match c.to_ascii_uppercase() {
            'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
            'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
            'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
            'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
            'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
            'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
            'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
            'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
            'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
            'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
            'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
            'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
            'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
            'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
            'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
            'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
            'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
            'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
            'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
            'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
            'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
            'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
            'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
            'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
            _ => return None,
        };
        Some(rows)
    }
}

impl GlyphMask for BlockFont {
    fn rasterize(&self, layout: &TextLayout) -> Coverage {
        let mut coverage = Coverage::blank(layout.canvas_width, layout.canvas_height);
        let cell = layout.font_px * Self::CAP_RATIO / Self::ROWS as f32;
        let advance = Self::COLUMNS + 1;
        let center_x = layout.canvas_width as f32 / 2.0;

        for (line, center_y) in layout.lines.iter().zip(layout.line_centers()) {
            let chars: Vec<char> = line.chars().collect();
            if chars.is_empty() {
                continue;
            }
            let width_cells = (chars.len() * advance - 1) as f32;
            let left = center_x - width_cells * cell / 2.0;
            let top = center_y - Self::ROWS as f32 * cell / 2.0;

            for (i, c) in chars.iter().enumerate() {
                // Unknown characters (including spaces) only advance the pen
                let Some(rows) = Self::glyph(*c) else {
                    continue;
                };
                let glyph_left = left + (i * advance) as f32 * cell;
                for (r, bits) in rows.iter().enumerate() {
                    for col in 0..Self::COLUMNS {
                        if bits & (1 << (Self::COLUMNS - 1 - col)) == 0 {
                            continue;
                        }
                        let x0 = glyph_left + col as f32 * cell;
                        let y0 = top + r as f32 * cell;
                        coverage.fill_rect(x0, y0, x0 + cell, y0 + cell);
                    }
                }
            }
        }

        coverage
    }
}

/// Cached samples for one device class
struct SampledText {
    /// Number of points lying on real glyph pixels
    natural: usize,
    points: TextPool,
    rng: ParticleRng,
}

/// Samples and caches text point clouds per device class.
///
/// A larger request keeps every previously returned point at the same index
/// and only appends halo points, so particles already bound to the pool keep
/// their targets.
pub struct TextSampler<M: GlyphMask = BlockFont> {
    mask: M,
    seed: u32,
    cache: HashMap<DeviceClass, SampledText>,
}

impl TextSampler<BlockFont> {
    pub fn new(seed: u32) -> Self {
        Self::with_mask(BlockFont, seed)
    }
}

impl<M: GlyphMask> TextSampler<M> {
    pub fn with_mask(mask: M, seed: u32) -> Self {
        Self {
            mask,
            seed,
            cache: HashMap::new(),
        }
    }

    /// Sample at least `count` points for `device`. The pool may be longer
    /// than requested when a larger request was served earlier. An empty
    /// pool means the mask lit nothing.
    pub fn sample(&mut self, count: usize, device: DeviceClass) -> TextPool {
        let seed = self.seed;
        let mask = &self.mask;
        let entry = self.cache.entry(device).or_insert_with(|| {
            let layout = TextLayout::for_device(device);
            let mut rng = ParticleRng::new(seed ^ device_salt(device));
            let points = sample_glyph_points(mask, &layout, &mut rng);
            log::debug!(
                "[text] Sampled {} glyph points for {:?}",
                points.len(),
                device
            );
            if points.is_empty() {
                log::warn!("[text] Glyph mask produced no lit pixels for {device:?}");
            }
            SampledText {
                natural: points.len(),
                points: points.into(),
                rng,
            }
        });

        if entry.natural == 0 || entry.points.len() >= count {
            return entry.points.clone();
        }

        let layout = TextLayout::for_device(device);
        let mut extended: Vec<Vec3> = entry.points.to_vec();
        for i in extended.len()..count {
            let mut p = extended[i % entry.natural];
            p.z -= entry.rng.next_f32() * layout.halo_depth;
            p.x += entry.rng.centered(layout.halo_spread);
            p.y += entry.rng.centered(layout.halo_spread);
            extended.push(p);
        }
        log::debug!(
            "[text] Extended {device:?} pool to {} points ({} halo)",
            extended.len(),
            extended.len() - entry.natural
        );
        entry.points = extended.into();
        entry.points.clone()
    }

    /// Number of points lying on glyph pixels for `device`, if sampled
    pub fn natural_count(&self, device: DeviceClass) -> Option<usize> {
        self.cache.get(&device).map(|s| s.natural)
    }

    /// Drop cached samples for every device class
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

fn device_salt(device: DeviceClass) -> u32 {
    match device {
        DeviceClass::Compact => 0x5EED_0001,
        DeviceClass::Wide => 0x5EED_0002,
    }
}

/// Grid-sample lit pixels into a shuffled world-space point list
fn sample_glyph_points<M: GlyphMask>(
    mask: &M,
    layout: &TextLayout,
    rng: &mut ParticleRng,
) -> Vec<Vec3> {
    let coverage = mask.rasterize(layout);
    let half_w = layout.canvas_width as f32 / 2.0;
    let half_h = layout.canvas_height as f32 / 2.0;
    let step = layout.step.max(1);

    let mut points = Vec::new();
    for y in (0..coverage.height).step_by(step) {
        for x in (0..coverage.width).step_by(step) {
            if !coverage.is_lit(x, y) {
                continue;
            }
            let px = (x as f32 - half_w) * layout.world_scale;
            let py = -(y as f32 - half_h) * layout.world_scale;
            let z = rng.centered(layout.depth_jitter);
            let fx = px + rng.centered(layout.xy_jitter);
            let fy = py + layout.lift + rng.centered(layout.xy_jitter);
            points.push(Vec3::new(fx, fy, z));
        }
    }

    rng.shuffle(&mut points);
    points
}

/// Hands out text points sequentially across generators.
///
/// Generators share one allocator in a fixed call order, so no two particles
/// receive the same point until the pool is exhausted, after which indices wrap.
#[derive(Debug, Clone)]
pub struct TextPointAllocator {
    pool: TextPool,
    cursor: usize,
}

impl TextPointAllocator {
    pub fn new(pool: TextPool) -> Self {
        Self { pool, cursor: 0 }
    }

    /// Next point, or `None` when the pool is empty
    pub fn next_point(&mut self) -> Option<Vec3> {
        if self.pool.is_empty() {
            return None;
        }
        let point = self.pool[self.cursor % self.pool.len()];
        self.cursor += 1;
        Some(point)
    }

    /// How many points have been handed out
    pub fn assigned(&self) -> usize {
        self.cursor
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }
}
