//! Scene orchestration
//!
//! `HolidayScene` owns every animator and effect and runs them once per frame
//! in a fixed order. The host requests a mode and reports the device class;
//! the scene latches the mode at the start of each frame so every system
//! sees the same state, and rebuilds formations when the device class changes.

use crate::animator::{
    DustLook, FairyLightLook, FoliageAnimator, GiftAnimator, InstanceState, LightAnimator,
    OrnamentAnimator, ParticleAnimator, RibbonAnimator, RibbonMesh, RibbonPath, StarAnimator,
};
use crate::cache::{FormationCache, FormationSet};
use crate::config::SceneConfig;
use crate::effects::{Fireworks, ShootingLight};
use crate::instance::{DrawData, DrawLayer, InstancePacker, InstanceRaw, PointRaw};
use crate::record::{Category, FormationKind};
use crate::text::{BlockFont, GlyphMask};
use evergreen_core::{Color, DeviceClass, Result};
use evergreen_runtime::{
    EventBus, FrameContext, ModeSwitch, SceneClock, SceneEvent, SceneMode, SceneSystem,
};

const SWAY_AMPLITUDE: f32 = 0.1;
const SHOOTING_LIGHT_COLOR: u32 = 0xFFF5D0;

/// Slow whole-scene yaw, calmer while scattered
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneSway {
    yaw: f32,
}

impl SceneSway {
    pub fn yaw(&self) -> f32 {
        self.yaw
    }
}

impl SceneSystem for SceneSway {
    fn update(&mut self, frame: &FrameContext) {
        let speed = if frame.is_tree() { 0.1 } else { 0.02 };
        self.yaw = (frame.elapsed * speed).sin() * SWAY_AMPLITUDE;
    }

    fn name(&self) -> &str {
        "sway"
    }
}

pub struct HolidayScene<M: GlyphMask = BlockFont> {
    config: SceneConfig,
    device: DeviceClass,
    mode: ModeSwitch,
    clock: SceneClock,
    events: EventBus,
    cache: FormationCache<M>,
    formations: FormationSet,

    foliage: FoliageAnimator,
    ornaments: OrnamentAnimator,
    lights: LightAnimator,
    gifts: GiftAnimator,
    star: StarAnimator,
    ribbon: RibbonAnimator,
    ribbon_mesh: RibbonMesh,
    shooting_light: ShootingLight,
    fireworks: Fireworks,
    sway: SceneSway,

    packer: InstancePacker,
    frame: FrameContext,
    frame_count: u64,
}

impl HolidayScene<BlockFont> {
    pub fn new(config: SceneConfig, device: DeviceClass) -> Result<Self> {
        Self::with_mask(BlockFont, config, device)
    }
}

impl<M: GlyphMask> HolidayScene<M> {
    /// Build a scene that rasterizes its text with `mask`
    pub fn with_mask(mask: M, config: SceneConfig, device: DeviceClass) -> Result<Self> {
        config.validate()?;

        let mut cache = FormationCache::with_mask(mask, config.seed);
        let formations = cache.formations(&config.counts.for_device(device), device);
        let ribbon_path = RibbonPath::spiral()?;
        let ribbon_mesh = RibbonMesh::build(&ribbon_path);
        log::debug!(
            "[particles] Ribbon mesh: {} vertices, {} triangles",
            ribbon_mesh.vertices.len(),
            ribbon_mesh.triangle_count()
        );

        let mut events = EventBus::new();
        events.push(SceneEvent::FormationsRebuilt {
            device,
            particles: formations.total(),
        });

        let initial = config.initial_mode;
        let mut scene = Self {
            foliage: ParticleAnimator::new(
                Category::Foliage,
                formations.foliage.clone(),
                FormationKind::Text,
                DustLook::foliage(device),
            ),
            ornaments: ParticleAnimator::new(
                Category::Ornament,
                formations.ornaments.clone(),
                FormationKind::Text,
                DustLook::ornaments(device),
            ),
            lights: ParticleAnimator::new(
                Category::Light,
                formations.lights.clone(),
                FormationKind::Text,
                FairyLightLook,
            ),
            gifts: GiftAnimator::new(formations.gifts.clone()),
            star: StarAnimator::new(formations.star.clone()),
            ribbon: RibbonAnimator::new(),
            ribbon_mesh,
            shooting_light: ShootingLight::new(config.shooting_light.clone()),
            fireworks: Fireworks::new(config.fireworks.clone(), config.seed.rotate_left(7)),
            sway: SceneSway::default(),
            packer: InstancePacker::new(),
            frame: FrameContext::new(initial, 0.0, 0.0),
            frame_count: 0,
            mode: ModeSwitch::new(initial),
            clock: SceneClock::new(),
            events,
            cache,
            formations,
            device,
            config,
        };
        scene.pack();
        Ok(scene)
    }

    /// Request a mode. It takes effect at the start of the next frame.
    pub fn request_mode(&mut self, mode: SceneMode) {
        self.mode.request(mode);
    }

    pub fn toggle(&mut self) {
        self.mode.toggle();
    }

    /// Mode of the most recent frame
    pub fn mode(&self) -> SceneMode {
        self.mode.active()
    }

    pub fn requested_mode(&self) -> SceneMode {
        self.mode.requested()
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// Report the host viewport width
    pub fn set_viewport_width(&mut self, width: u32) -> bool {
        self.set_device_class(DeviceClass::from_viewport_width(width))
    }

    /// Switch device class, rebuilding formations and resizing every
    /// animator to the new counts. Returns false when nothing changed.
    pub fn set_device_class(&mut self, device: DeviceClass) -> bool {
        if device == self.device {
            return false;
        }
        log::info!("[particles] Device class {:?} -> {:?}", self.device, device);
        self.events.push(SceneEvent::DeviceClassChanged {
            from: self.device,
            to: device,
        });
        self.device = device;

        let formations = self
            .cache
            .formations(&self.config.counts.for_device(device), device);
        self.foliage.rebind(formations.foliage.clone());
        self.foliage.set_look(DustLook::foliage(device));
        self.ornaments.rebind(formations.ornaments.clone());
        self.ornaments.set_look(DustLook::ornaments(device));
        self.lights.rebind(formations.lights.clone());
        self.gifts.rebind(formations.gifts.clone());

        self.events.push(SceneEvent::FormationsRebuilt {
            device,
            particles: formations.total(),
        });
        self.formations = formations;
        self.pack();
        true
    }

    /// Run one frame with an explicit delta in seconds
    pub fn advance(&mut self, delta: f32) {
        self.clock.advance(delta as f64);
        self.run_frame();
    }

    /// Run one frame timed by the wall clock
    pub fn tick(&mut self) {
        self.clock.tick();
        self.run_frame();
    }

    fn run_frame(&mut self) {
        if let Some((from, to)) = self.mode.latch() {
            self.events.push(SceneEvent::ModeChanged { from, to });
        }
        let frame = FrameContext::new(self.mode.active(), self.clock.delta(), self.clock.elapsed());
        self.fireworks.set_armed(!frame.is_tree());

        let systems: [&mut dyn SceneSystem; 9] = [
            &mut self.foliage,
            &mut self.ornaments,
            &mut self.lights,
            &mut self.gifts,
            &mut self.star,
            &mut self.ribbon,
            &mut self.shooting_light,
            &mut self.fireworks,
            &mut self.sway,
        ];
        for system in systems {
            log::trace!("[particles] Updating {}", system.name());
            system.update(&frame);
        }

        for batch in self.fireworks.take_launches() {
            self.events.push(SceneEvent::FireworkLaunched { batch });
        }

        self.frame = frame;
        self.frame_count += 1;
        self.pack();
    }

    fn pack(&mut self) {
        let packer = &mut self.packer;
        packer.clear();
        packer.push_layer(DrawLayer::Foliage, self.foliage.instances());
        packer.push_layer(DrawLayer::Ornaments, self.ornaments.instances());
        packer.push_layer(DrawLayer::Lights, self.lights.instances());
        packer.push_layer(DrawLayer::GiftBodies, self.gifts.bodies());
        packer.push_layer(DrawLayer::GiftLids, self.gifts.lids());
        packer.push_layer(DrawLayer::Star, std::slice::from_ref(self.star.instance()));
        let light = InstanceState {
            transform: *self.shooting_light.transform(),
            color: Color::from_hex(SHOOTING_LIGHT_COLOR).scaled(2.0),
        };
        packer.push_layer(DrawLayer::ShootingLight, std::slice::from_ref(&light));
        packer.push_points(self.fireworks.points());
    }

    /// Take every event raised since the previous drain
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain()
    }

    /// Events waiting to be drained
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn frame(&self) -> &FrameContext {
        &self.frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn formations(&self) -> &FormationSet {
        &self.formations
    }

    pub fn foliage(&self) -> &FoliageAnimator {
        &self.foliage
    }

    pub fn ornaments(&self) -> &OrnamentAnimator {
        &self.ornaments
    }

    pub fn lights(&self) -> &LightAnimator {
        &self.lights
    }

    pub fn gifts(&self) -> &GiftAnimator {
        &self.gifts
    }

    pub fn star(&self) -> &StarAnimator {
        &self.star
    }

    pub fn ribbon(&self) -> &RibbonAnimator {
        &self.ribbon
    }

    pub fn ribbon_mesh(&self) -> &RibbonMesh {
        &self.ribbon_mesh
    }

    pub fn shooting_light(&self) -> &ShootingLight {
        &self.shooting_light
    }

    pub fn fireworks(&self) -> &Fireworks {
        &self.fireworks
    }

    pub fn sway(&self) -> &SceneSway {
        &self.sway
    }

    pub fn draw_data(&self) -> Vec<DrawData<'_>> {
        self.packer.draw_data()
    }

    pub fn instance_data(&self) -> &[InstanceRaw] {
        self.packer.instance_data()
    }

    pub fn layer(&self, layer: DrawLayer) -> Option<&[InstanceRaw]> {
        self.packer.layer(layer)
    }

    pub fn point_data(&self) -> &[PointRaw] {
        self.packer.point_data()
    }
}
