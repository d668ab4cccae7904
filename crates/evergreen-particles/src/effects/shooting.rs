//! A light spiralling up around the tree with a fading trail

use crate::config::ShootingLightConfig;
use evergreen_core::{Transform, Vec3};
use evergreen_runtime::{FrameContext, SceneSystem};
use std::collections::VecDeque;
use std::f32::consts::PI;

const START_HEIGHT: f32 = -8.0;
const CLIMB: f32 = 17.0;
const START_RADIUS: f32 = 9.0;
const TURNS: f32 = 5.0;
const TUMBLE_RATE: f32 = 2.0;

/// Point on the climb for progress `t` in [0, 1]
pub fn path_point(t: f32) -> Vec3 {
    let angle = t * PI * 2.0 * TURNS;
    let radius = START_RADIUS * (1.0 - t);
    Vec3::new(angle.cos() * radius, START_HEIGHT + t * CLIMB, angle.sin() * radius)
}

/// The shooting light. Only visible in tree mode.
pub struct ShootingLight {
    config: ShootingLightConfig,
    progress: f32,
    transform: Transform,
    /// Recent positions, oldest first
    trail: VecDeque<Vec3>,
}

impl ShootingLight {
    pub fn new(config: ShootingLightConfig) -> Self {
        let capacity = config.trail_length.max(1);
        Self {
            transform: Transform::from_position(path_point(0.0)).with_uniform_scale(0.0),
            trail: VecDeque::with_capacity(capacity),
            progress: 0.0,
            config,
        }
    }

    pub fn update(&mut self, frame: &FrameContext) {
        if !frame.is_tree() {
            self.transform.scale = Vec3::ZERO;
            self.trail.clear();
            return;
        }

        self.progress += frame.delta * self.config.speed;
        if self.progress > 1.0 {
            // Loop back to the bottom without drawing a streak across the tree
            self.progress = 0.0;
            self.trail.clear();
        }

        let position = path_point(self.progress);
        self.transform.position = position;
        self.transform.scale = Vec3::ONE;
        self.transform.rotation.x += frame.delta * TUMBLE_RATE;
        self.transform.rotation.z += frame.delta * TUMBLE_RATE;

        if self.trail.len() >= self.config.trail_length.max(1) {
            self.trail.pop_front();
        }
        self.trail.push_back(position);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn is_visible(&self) -> bool {
        !self.transform.is_hidden()
    }

    pub fn trail(&self) -> &VecDeque<Vec3> {
        &self.trail
    }

    /// Trail samples paired with their width, oldest (thinnest) first.
    /// Width attenuates quadratically toward the tail.
    pub fn trail_segments(&self) -> Vec<(Vec3, f32)> {
        let len = self.trail.len();
        self.trail
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let t = (i + 1) as f32 / len as f32;
                (p, self.config.trail_width * t * t)
            })
            .collect()
    }
}

impl SceneSystem for ShootingLight {
    fn update(&mut self, frame: &FrameContext) {
        ShootingLight::update(self, frame);
    }

    fn name(&self) -> &str {
        "shooting_light"
    }
}
