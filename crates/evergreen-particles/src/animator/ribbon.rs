//! Spiral ribbon: centripetal path, swept flat mesh and scale/opacity easing

use bytemuck::{Pod, Zeroable};
use evergreen_core::{CatmullRomCurve, CurveKind, EvergreenError, Result, Vec3};
use evergreen_runtime::{FrameContext, SceneSystem};
use std::f32::consts::TAU;

/// Ribbon mesh vertex. 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Spiral path the ribbon follows around the tree
#[derive(Debug, Clone)]
pub struct RibbonPath {
    curve: CatmullRomCurve,
}

impl RibbonPath {
    pub const TURNS: f32 = 4.5;
    pub const HEIGHT: f32 = 16.0;
    pub const BASE_RADIUS: f32 = 7.5;
    pub const POINTS_PER_TURN: usize = 20;

    /// Centripetal path through the given control points
    pub fn through(points: Vec<Vec3>) -> Result<Self> {
        let count = points.len();
        let curve = CatmullRomCurve::new(points, CurveKind::Centripetal).ok_or_else(|| {
            EvergreenError::InvalidParticleLayout(format!(
                "ribbon path needs at least 2 control points, got {count}"
            ))
        })?;
        Ok(Self { curve })
    }

    /// The default spiral: radius shrinking linearly to the top
    pub fn spiral() -> Result<Self> {
        let segments = (Self::TURNS * Self::POINTS_PER_TURN as f32) as usize;
        let points: Vec<Vec3> = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let angle = t * Self::TURNS * TAU;
                let radius = Self::BASE_RADIUS * (1.0 - t) * 0.9 + 0.5;
                let y = -Self::HEIGHT / 2.0 + t * Self::HEIGHT;
                Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
            })
            .collect();
        Self::through(points)
    }

    pub fn curve(&self) -> &CatmullRomCurve {
        &self.curve
    }

    pub fn length(&self) -> f32 {
        self.curve.length()
    }
}

/// Triangle mesh of a flat band swept along a path
#[derive(Debug, Clone, Default)]
pub struct RibbonMesh {
    pub vertices: Vec<RibbonVertex>,
    pub indices: Vec<u32>,
}

/// Local frame at one sample along the path
struct Frame {
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl RibbonMesh {
    pub const WIDTH: f32 = 0.6;
    pub const THICKNESS: f32 = 0.02;
    pub const STEPS: usize = 400;

    /// Sweep the default ribbon cross-section along `path`
    pub fn build(path: &RibbonPath) -> Self {
        Self::sweep(path, Self::WIDTH, Self::THICKNESS, Self::STEPS)
    }

    /// Sweep a `width` x `thickness` rectangle along the path with `steps`
    /// arc-length spaced segments. Faces get their own vertices for flat
    /// normals; both open ends are capped.
    pub fn sweep(path: &RibbonPath, width: f32, thickness: f32, steps: usize) -> Self {
        let steps = steps.max(1);
        let frames: Vec<Frame> = (0..=steps)
            .map(|i| frame_at(path.curve(), i as f32 / steps as f32))
            .collect();

        let hw = width / 2.0;
        let hh = thickness / 2.0;
        // Corner order: bottom-left, bottom-right, top-right, top-left
        let corners: Vec<[Vec3; 4]> = frames
            .iter()
            .map(|f| {
                [
                    f.position + f.right * -hw + f.up * -hh,
                    f.position + f.right * hw + f.up * -hh,
                    f.position + f.right * hw + f.up * hh,
                    f.position + f.right * -hw + f.up * hh,
                ]
            })
            .collect();

        let mut mesh = Self {
            vertices: Vec::with_capacity(steps * 16 + 8),
            indices: Vec::with_capacity(steps * 24 + 12),
        };

        // (corner a, corner b, normal direction) for top, bottom, left, right
        let faces: [(usize, usize, fn(&Frame) -> Vec3); 4] = [
            (3, 2, |f| f.up),
            (1, 0, |f| -f.up),
            (0, 3, |f| -f.right),
            (2, 1, |f| f.right),
        ];

        for seg in 0..steps {
            let u0 = seg as f32 / steps as f32;
            let u1 = (seg + 1) as f32 / steps as f32;
            let (here, next) = (&corners[seg], &corners[seg + 1]);
            for (a, b, normal_of) in faces {
                let normal = ((normal_of(&frames[seg]) + normal_of(&frames[seg + 1])) * 0.5).normalized();
                mesh.push_quad(
                    [here[a], here[b], next[a], next[b]],
                    normal,
                    [[0.0, u0], [1.0, u0], [0.0, u1], [1.0, u1]],
                    false,
                );
            }
        }

        let uv = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let first = &corners[0];
        mesh.push_quad(
            [first[0], first[1], first[3], first[2]],
            -frames[0].forward,
            uv,
            true,
        );
        let last = &corners[steps];
        mesh.push_quad(
            [last[0], last[1], last[3], last[2]],
            frames[steps].forward,
            uv,
            false,
        );

        mesh
    }

    /// Two triangles over `[p0, p1, p2, p3]` laid out as a strip
    fn push_quad(&mut self, quad: [Vec3; 4], normal: Vec3, uvs: [[f32; 2]; 4], flip: bool) {
        let base = self.vertices.len() as u32;
        for (p, uv) in quad.iter().zip(uvs) {
            self.vertices.push(RibbonVertex {
                position: p.to_array(),
                normal: normal.to_array(),
                uv,
            });
        }
        if flip {
            self.indices
                .extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
        } else {
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn frame_at(curve: &CatmullRomCurve, u: f32) -> Frame {
    let position = curve.point_at(u);
    let forward = curve.tangent_at(u);
    // Near-vertical tangents fall back to a fixed reference axis
    let reference = if forward.dot(&Vec3::UP).abs() > 0.99 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        Vec3::UP
    };
    let right = forward.cross(&reference).normalized();
    let up = right.cross(&forward).normalized();
    Frame {
        position,
        forward,
        right,
        up,
    }
}

/// Eases the ribbon's scale and opacity with the scene mode
pub struct RibbonAnimator {
    scale: f32,
    opacity: f32,
}

impl Default for RibbonAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl RibbonAnimator {
    const RATE: f32 = 1.5;

    pub fn new() -> Self {
        Self {
            scale: 1.0,
            opacity: 1.0,
        }
    }

    pub fn update(&mut self, frame: &FrameContext) {
        let (target_scale, target_opacity) = if frame.is_tree() { (1.0, 1.0) } else { (3.0, 0.0) };
        let rate = (frame.delta * Self::RATE).min(1.0);
        self.scale += (target_scale - self.scale) * rate;
        self.opacity += (target_opacity - self.opacity) * rate;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl SceneSystem for RibbonAnimator {
    fn update(&mut self, frame: &FrameContext) {
        RibbonAnimator::update(self, frame);
    }

    fn name(&self) -> &str {
        "ribbon"
    }
}
