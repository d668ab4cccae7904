//! Text pool inspection

use anyhow::{bail, Result};
use evergreen_core::{DeviceClass, Vec3};
use evergreen_particles::{TextLayout, TextSampler};

pub fn run(count: usize, compact: bool, seed: u32) -> Result<()> {
    let device = DeviceClass::from_compact_flag(compact);
    let layout = TextLayout::for_device(device);
    let mut sampler = TextSampler::new(seed);
    let pool = sampler.sample(count, device);

    if pool.is_empty() {
        bail!("Glyph mask produced no points for {:?}", device);
    }

    let natural = sampler.natural_count(device).unwrap_or(0);
    let (min, max) = pool.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(lo, hi), p| (lo.component_min(p), hi.component_max(p)),
    );

    println!("Text: {}", layout.lines.join(" "));
    println!("Device:        {:?}", device);
    println!("Requested:     {}", count);
    println!("Glyph points:  {}", natural);
    println!("Halo points:   {}", pool.len().saturating_sub(natural));
    println!(
        "Bounds:        ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );

    Ok(())
}
