//! Headless scene simulation

use anyhow::{bail, Context, Result};
use evergreen_core::DeviceClass;
use evergreen_particles::{FormationKind, HolidayScene, SceneConfig};
use evergreen_runtime::SceneEvent;
use std::path::Path;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub frames: u32,
    pub fps: u32,
    pub toggle_every: f32,
    pub compact: bool,
    pub resize: bool,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if args.fps == 0 {
        bail!("--fps must be greater than zero");
    }

    let config = match &args.config {
        Some(path) => SceneConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load scene config '{}'", path))?,
        None => SceneConfig::default(),
    };
    let device = DeviceClass::from_compact_flag(args.compact);
    let mut scene = HolidayScene::new(config, device).context("Failed to build scene")?;

    let dt = 1.0 / args.fps as f32;
    let toggle_frames = if args.toggle_every > 0.0 {
        ((args.toggle_every * args.fps as f32).round() as u32).max(1)
    } else {
        0
    };

    println!(
        "Simulating {} frames at {} fps ({:?}, {} particles)",
        args.frames,
        args.fps,
        device,
        scene.formations().total()
    );

    let mut launches = 0;
    for frame in 1..=args.frames {
        if toggle_frames > 0 && frame % toggle_frames == 0 {
            scene.toggle();
        }
        if args.resize && frame == args.frames / 2 {
            let other = if scene.device().is_compact() {
                DeviceClass::Wide
            } else {
                DeviceClass::Compact
            };
            log::info!("[simulate] Switching to {other:?} at frame {frame}");
            scene.set_device_class(other);
        }

        scene.advance(dt);

        for event in scene.drain_events() {
            match event {
                SceneEvent::FireworkLaunched { .. } => launches += 1,
                SceneEvent::ModeChanged { from, to } => {
                    println!("  [{:>7.2}s] {} -> {}", scene.elapsed(), from, to)
                }
                SceneEvent::DeviceClassChanged { from, to } => {
                    println!("  [{:>7.2}s] device {:?} -> {:?}", scene.elapsed(), from, to)
                }
                SceneEvent::FormationsRebuilt { device, particles } => {
                    println!("  [{:>7.2}s] rebuilt {:?}: {} particles", scene.elapsed(), device, particles)
                }
            }
        }

        if frame % args.fps == 0 {
            let target = if scene.frame().is_tree() {
                FormationKind::Tree
            } else {
                FormationKind::Text
            };
            println!(
                "  [{:>7.2}s] {:<10} foliage {:>6.2} lights {:>6.2} fireworks {:>2} active",
                scene.elapsed(),
                scene.mode().to_string(),
                scene.foliage().mean_distance(target),
                scene.lights().mean_distance(target),
                scene.fireworks().active_batches()
            );
        }
    }

    println!();
    println!("Frames:           {}", scene.frame_count());
    println!("Final mode:       {}", scene.mode());
    println!("Firework batches: {launches} launched");
    println!("Instances/frame:  {}", scene.instance_data().len());
    println!("Sparks/frame:     {}", scene.point_data().len());

    Ok(())
}
