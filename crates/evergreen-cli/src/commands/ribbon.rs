//! Ribbon mesh statistics

use anyhow::{Context, Result};
use evergreen_particles::{RibbonMesh, RibbonPath};

pub fn run(steps: usize) -> Result<()> {
    let path = RibbonPath::spiral().context("Failed to build ribbon path")?;
    let mesh = RibbonMesh::sweep(&path, RibbonMesh::WIDTH, RibbonMesh::THICKNESS, steps);

    println!("Ribbon path:");
    println!("  Turns:          {}", RibbonPath::TURNS);
    println!("  Control points: {}", path.curve().control_points().len());
    println!("  Length:         {:.2}", path.length());
    println!("Ribbon mesh:");
    println!("  Steps:          {}", steps.max(1));
    println!("  Vertices:       {}", mesh.vertices.len());
    println!("  Triangles:      {}", mesh.triangle_count());
    println!(
        "  Vertex bytes:   {}",
        std::mem::size_of_val(mesh.vertices.as_slice())
    );

    Ok(())
}
