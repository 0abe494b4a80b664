//! terrain info command - report STL statistics.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use terrain_mesh::TerrainMesh;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct InfoResult {
    path: String,
    triangles: usize,
    min: Option<[f64; 3]>,
    max: Option<[f64; 3]>,
    surface_area: f64,
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let mesh =
        TerrainMesh::load(input).with_context(|| format!("Failed to load mesh from {:?}", input))?;

    let bounds = mesh.bounds();
    let result = InfoResult {
        path: input.display().to_string(),
        triangles: mesh.triangle_count(),
        min: bounds.map(|(min, _)| [min.x, min.y, min.z]),
        max: bounds.map(|(_, max)| [max.x, max.y, max.z]),
        surface_area: mesh.surface_area(),
    };

    match cli.format {
        OutputFormat::Json => output::print(&result, cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", result.path);
                output::field("Triangles", result.triangles);
                if let Some((min, max)) = bounds {
                    let dims = max - min;
                    output::field(
                        "Size",
                        format!("{:.2} x {:.2} x {:.2}", dims.x, dims.y, dims.z),
                    );
                }
                output::field("Area", format!("{:.2}", result.surface_area));
            }
        }
    }

    Ok(())
}
