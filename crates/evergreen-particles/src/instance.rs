//! GPU-ready instance data packed from the animators every tick

use crate::animator::InstanceState;
use crate::effects::FireworkParticle;
use bytemuck::{Pod, Zeroable};
use evergreen_core::{Color, Transform};
use glam::{EulerRot, Mat4, Quat};

/// Per-instance data for meshes drawn with instancing. 80 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn new(transform: &Transform, color: Color) -> Self {
        Self {
            model: model_matrix(transform).to_cols_array_2d(),
            color: color.to_array(),
        }
    }

    pub fn from_state(state: &InstanceState) -> Self {
        Self::new(&state.transform, state.color)
    }
}

/// Point sprite for firework sparks. 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointRaw {
    pub pos_size: [f32; 4], // xyz = position, w = size
    pub color: [f32; 4],
}

impl PointRaw {
    pub fn new(particle: &FireworkParticle, color: Color, size: f32) -> Self {
        let p = particle.position;
        Self {
            pos_size: [p.x, p.y, p.z, size],
            color: [color.r, color.g, color.b, particle.life.clamp(0.0, 1.0)],
        }
    }
}

pub fn model_matrix(transform: &Transform) -> Mat4 {
    let t = transform;
    Mat4::from_scale_rotation_translation(
        glam::Vec3::new(t.scale.x, t.scale.y, t.scale.z),
        Quat::from_euler(EulerRot::XYZ, t.rotation.x, t.rotation.y, t.rotation.z),
        glam::Vec3::new(t.position.x, t.position.y, t.position.z),
    )
}

/// Which mesh and pipeline an instance range is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawLayer {
    Foliage,
    Ornaments,
    Lights,
    GiftBodies,
    GiftLids,
    Star,
    ShootingLight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    Additive,
}

impl DrawLayer {
    pub fn blend_mode(&self) -> BlendMode {
        match self {
            DrawLayer::Lights | DrawLayer::Star | DrawLayer::ShootingLight => BlendMode::Additive,
            _ => BlendMode::Opaque,
        }
    }
}

/// Draw data for one layer, consumed by the renderer
pub struct DrawData<'a> {
    pub layer: DrawLayer,
    pub instances: &'a [InstanceRaw],
    pub blend_mode: BlendMode,
}

/// Packs every layer's instances into one contiguous buffer for upload
#[derive(Default)]
pub struct InstancePacker {
    instance_buffer: Vec<InstanceRaw>,
    /// (layer, start, count) into `instance_buffer`
    instance_ranges: Vec<(DrawLayer, usize, usize)>,
    point_buffer: Vec<PointRaw>,
}

impl InstancePacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame. Capacity is kept.
    pub fn clear(&mut self) {
        self.instance_buffer.clear();
        self.instance_ranges.clear();
        self.point_buffer.clear();
    }

    /// Append one layer. Every slot is packed, hidden ones included, so
    /// instance index `i` always maps to particle `i` of the layer.
    pub fn push_layer(&mut self, layer: DrawLayer, states: &[InstanceState]) {
        let start = self.instance_buffer.len();
        self.instance_buffer
            .extend(states.iter().map(InstanceRaw::from_state));
        self.instance_ranges.push((layer, start, states.len()));
    }

    pub fn push_points<'p>(
        &mut self,
        points: impl Iterator<Item = (&'p FireworkParticle, Color, f32)>,
    ) {
        self.point_buffer
            .extend(points.map(|(p, color, size)| PointRaw::new(p, color, size)));
    }

    pub fn instance_data(&self) -> &[InstanceRaw] {
        &self.instance_buffer
    }

    pub fn point_data(&self) -> &[PointRaw] {
        &self.point_buffer
    }

    /// Instances of a single layer, if it was packed this frame
    pub fn layer(&self, layer: DrawLayer) -> Option<&[InstanceRaw]> {
        self.instance_ranges
            .iter()
            .find(|(l, _, _)| *l == layer)
            .map(|&(_, start, count)| &self.instance_buffer[start..start + count])
    }

    pub fn draw_data(&self) -> Vec<DrawData<'_>> {
        self.instance_ranges
            .iter()
            .map(|&(layer, start, count)| DrawData {
                layer,
                instances: &self.instance_buffer[start..start + count],
                blend_mode: layer.blend_mode(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evergreen_core::Vec3;

    #[test]
    fn layouts_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
        assert_eq!(std::mem::size_of::<PointRaw>(), 32);
    }

    #[test]
    fn model_matrix_places_translation_in_last_column() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0);
        let raw = InstanceRaw::new(&transform, Color::WHITE);
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.model[0], [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(raw.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn hidden_instance_has_zero_basis() {
        let raw = InstanceRaw::from_state(&InstanceState::hidden());
        for col in &raw.model[0..3] {
            assert!(col.iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn rotation_follows_euler_xyz() {
        let transform = Transform::IDENTITY.with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let m = model_matrix(&transform);
        let x_axis = m.transform_vector3(glam::Vec3::X);
        assert!((x_axis - glam::Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn packer_tracks_layer_ranges() {
        let mut packer = InstancePacker::new();
        let a = vec![InstanceState::hidden(); 3];
        let b = vec![
            InstanceState {
                transform: Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
                color: Color::WHITE,
            };
            2
        ];
        packer.push_layer(DrawLayer::Foliage, &a);
        packer.push_layer(DrawLayer::Star, &b);

        assert_eq!(packer.instance_data().len(), 5);
        assert_eq!(packer.layer(DrawLayer::Foliage).map(|l| l.len()), Some(3));
        assert_eq!(packer.layer(DrawLayer::Star).map(|l| l[0].model[3][1]), Some(5.0));
        assert!(packer.layer(DrawLayer::Lights).is_none());

        let draws = packer.draw_data();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].blend_mode, BlendMode::Opaque);
        assert_eq!(draws[1].blend_mode, BlendMode::Additive);

        packer.clear();
        assert!(packer.instance_data().is_empty());
        assert!(packer.draw_data().is_empty());
    }

    #[test]
    fn points_fade_with_life() {
        let spark = FireworkParticle {
            position: Vec3::new(1.0, 2.0, 3.0),
            velocity: Vec3::ZERO,
            life: 0.25,
        };
        let point = PointRaw::new(&spark, Color::from_hex(0xFF0000), 0.6);
        assert_eq!(point.pos_size, [1.0, 2.0, 3.0, 0.6]);
        assert_eq!(point.color[3], 0.25);

        let mut packer = InstancePacker::new();
        packer.push_points([(&spark, Color::WHITE, 0.6)].into_iter());
        assert_eq!(packer.point_data().len(), 1);
    }
}
