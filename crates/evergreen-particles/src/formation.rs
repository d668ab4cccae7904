//! Formation generators: per-category tree, text and scatter targets
//!
//! Every generator is a pure function of its inputs plus a seeded RNG.
//! Text targets come from a shared `TextPointAllocator` so that categories
//! drawing in a fixed order never reuse a text point until the pool wraps.

use crate::rand::ParticleRng;
use crate::record::{Category, FormationTargets, ParticleRecord};
use crate::text::TextPointAllocator;
use evergreen_core::{Color, Vec3};

pub const LEAF_PALETTE: [u32; 4] = [0x1A3300, 0x2D4F14, 0x0F2206, 0x41612A];
pub const ORNAMENT_PALETTE: [u32; 4] = [0xC41E3A, 0xD4AF37, 0xC0C0C0, 0x8B0000];
pub const LIGHT_PALETTE: [u32; 3] = [0xFFD700, 0xFFECB3, 0xFFA500];
pub const GIFT_PALETTE: [u32; 5] = [0x8B0000, 0x1A3300, 0xD4AF37, 0xFFFFFF, 0x222222];

pub const TREE_HEIGHT: f32 = 16.0;

const GIFT_INNER_RADIUS: f32 = 3.0;
const GIFT_OUTER_RADIUS: f32 = 7.0;
const GIFT_GROUND_Y: f32 = -8.5;
const GIFT_STACK_CHANCE: f32 = 0.2;
const GIFT_STACK_HEIGHT: f32 = 1.5;

pub const STAR_TREE_POSITION: Vec3 = Vec3::new(0.0, 9.2, 0.0);
pub const STAR_SCATTER_POSITION: Vec3 = Vec3::new(0.0, 18.0, 0.0);

/// Convert a hex palette into colors
pub fn palette(hex: &[u32]) -> Vec<Color> {
    hex.iter().map(|&h| Color::from_hex(h)).collect()
}

/// Default palette for a category
pub fn default_palette(category: Category) -> Vec<Color> {
    match category {
        Category::Foliage => palette(&LEAF_PALETTE),
        Category::Ornament => palette(&ORNAMENT_PALETTE),
        Category::Light => palette(&LIGHT_PALETTE),
        Category::Gift => palette(&GIFT_PALETTE),
        Category::Star => palette(&[0xFFD700]),
        Category::Ribbon => palette(&[0xD4AF37]),
    }
}

/// Shape and per-particle ranges for one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationParams {
    pub tree_height: f32,
    /// Cone radius at the base of the tree
    pub base_radius: f32,
    pub scatter_radius: f32,
    pub scale: (f32, f32),
    pub speed: (f32, f32),
}

impl FormationParams {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Foliage => Self {
                tree_height: TREE_HEIGHT,
                base_radius: 7.0,
                scatter_radius: 35.0,
                scale: (0.8, 1.5),
                speed: (0.4, 1.0),
            },
            Category::Ornament => Self {
                tree_height: TREE_HEIGHT,
                base_radius: 6.8,
                scatter_radius: 30.0,
                scale: (0.8, 1.2),
                speed: (0.5, 1.0),
            },
            Category::Light => Self {
                tree_height: TREE_HEIGHT,
                base_radius: 6.8,
                scatter_radius: 30.0,
                scale: (0.5, 1.0),
                speed: (0.5, 1.0),
            },
            Category::Gift => Self {
                tree_height: TREE_HEIGHT,
                base_radius: GIFT_OUTER_RADIUS,
                scatter_radius: 40.0,
                scale: (0.8, 1.6),
                speed: (0.3, 0.7),
            },
            Category::Star | Category::Ribbon => Self {
                tree_height: TREE_HEIGHT,
                base_radius: 0.0,
                scatter_radius: 0.0,
                scale: (1.0, 1.0),
                speed: (1.0, 1.0),
            },
        }
    }

    fn height_to_y(&self, h: f32) -> f32 {
        -self.tree_height / 2.0 + h * self.tree_height
    }
}

/// Generate the records for `category`.
///
/// `text` is consulted only by categories that form text. Star and ribbon
/// are not particle categories and yield the star's single record or nothing.
pub fn generate(
    category: Category,
    count: usize,
    colors: &[Color],
    params: &FormationParams,
    rng: &mut ParticleRng,
    text: &mut TextPointAllocator,
) -> Vec<ParticleRecord> {
    match category {
        Category::Foliage => generate_foliage(count, colors, params, rng, text),
        Category::Ornament | Category::Light => {
            generate_decorations(count, colors, params, rng, text)
        }
        Category::Gift => generate_gifts(count, colors, params, rng),
        Category::Star => vec![star_record()],
        Category::Ribbon => Vec::new(),
    }
}

fn pick_color(colors: &[Color], rng: &mut ParticleRng) -> Color {
    rng.pick(colors).copied().unwrap_or(Color::WHITE)
}

/// Text target for the next particle, falling back to its scatter target
/// when the pool is empty so no particle is left without a destination.
fn next_text_target(text: &mut TextPointAllocator, scatter: Vec3) -> Vec3 {
    text.next_point().unwrap_or(scatter)
}

/// Needles: base-biased cone with a fluffy rim and organic jitter
pub fn generate_foliage(
    count: usize,
    colors: &[Color],
    params: &FormationParams,
    rng: &mut ParticleRng,
    text: &mut TextPointAllocator,
) -> Vec<ParticleRecord> {
    if text.pool_len() == 0 && count > 0 {
        log::warn!("[formation] Empty text pool, foliage text targets fall back to scatter");
    }
    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let h = 1.0 - rng.next_f32().powf(0.8);
        let y = params.height_to_y(h);
        let cone_radius = params.base_radius * (1.0 - h);
        let r = cone_radius * rng.next_f32().powf(0.4);
        let angle = rng.angle();
        let fluff = 0.5 * (1.0 - h);
        let x = r * angle.cos() + rng.centered(fluff);
        let z = r * angle.sin() + rng.centered(fluff);

        let tree = Vec3::new(x, y, z);
        let scatter = rng.in_sphere(params.scatter_radius);
        let text_target = next_text_target(text, scatter);
        let rotation = Vec3::new(rng.half_angle(), rng.half_angle(), rng.half_angle());

        let mut color = pick_color(colors, rng);
        if h > 0.8 {
            color = color.offset_hsl(0.02, 0.1, 0.05);
        }
        if r < cone_radius * 0.5 {
            color = color.offset_hsl(0.0, 0.0, -0.15);
        }

        records.push(ParticleRecord {
            id: i as u32,
            targets: FormationTargets {
                tree,
                text: text_target,
                scatter,
            },
            origin: tree,
            rotation,
            scale: rng.range(params.scale.0, params.scale.1),
            color,
            speed: rng.range(params.speed.0, params.speed.1),
        });
    }
    records
}

/// Ornaments and lights: uniform height, hung on a thin band at the cone's rim
pub fn generate_decorations(
    count: usize,
    colors: &[Color],
    params: &FormationParams,
    rng: &mut ParticleRng,
    text: &mut TextPointAllocator,
) -> Vec<ParticleRecord> {
    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let h = rng.next_f32();
        let y = params.height_to_y(h);
        let cone_radius = params.base_radius * (1.0 - h);
        let r = cone_radius * rng.range(0.85, 1.0);
        let angle = rng.angle();

        let tree = Vec3::new(r * angle.cos(), y, r * angle.sin());
        let scatter = rng.in_sphere(params.scatter_radius);
        let text_target = next_text_target(text, scatter);

        records.push(ParticleRecord {
            id: i as u32,
            targets: FormationTargets {
                tree,
                text: text_target,
                scatter,
            },
            origin: tree,
            rotation: Vec3::ZERO,
            scale: rng.range(params.scale.0, params.scale.1),
            color: pick_color(colors, rng),
            speed: rng.range(params.speed.0, params.speed.1),
        });
    }
    records
}

/// Gifts: uniform-area annulus on the ground, some stacked
pub fn generate_gifts(
    count: usize,
    colors: &[Color],
    params: &FormationParams,
    rng: &mut ParticleRng,
) -> Vec<ParticleRecord> {
    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let theta = rng.angle();
        let r = GIFT_INNER_RADIUS + rng.next_f32().sqrt() * (GIFT_OUTER_RADIUS - GIFT_INNER_RADIUS);
        let stacked = rng.chance(GIFT_STACK_CHANCE);
        let lift = if stacked {
            rng.next_f32() * GIFT_STACK_HEIGHT
        } else {
            0.0
        };
        let tree = Vec3::new(r * theta.cos(), GIFT_GROUND_Y + 0.5 + lift, r * theta.sin());

        records.push(ParticleRecord {
            id: i as u32,
            targets: FormationTargets {
                tree,
                text: Vec3::ZERO,
                scatter: rng.in_sphere(params.scatter_radius),
            },
            origin: tree,
            rotation: Vec3::new(0.0, rng.half_angle(), 0.0),
            scale: rng.range(params.scale.0, params.scale.1),
            color: pick_color(colors, rng),
            speed: rng.range(params.speed.0, params.speed.1),
        });
    }
    records
}

/// The top star: a resting point above the tree and a raised dispersed point
pub fn star_record() -> ParticleRecord {
    ParticleRecord {
        id: 0,
        targets: FormationTargets {
            tree: STAR_TREE_POSITION,
            text: Vec3::ZERO,
            scatter: STAR_SCATTER_POSITION,
        },
        origin: STAR_TREE_POSITION,
        rotation: Vec3::ZERO,
        scale: 1.0,
        color: Color::from_hex(0xFFD700),
        speed: 1.0,
    }
}
