//! STL reading and writing for terrain meshes.
//!
//! Writes go to a temporary file next to the destination and are renamed into
//! place only after every byte is flushed, so a failed write never leaves a
//! half-written STL behind. Output is deterministic: the binary header is
//! always zeroed and ASCII output uses the shortest round-trip float format.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::error::{TerrainError, TerrainResult};
use crate::types::{TerrainMesh, Triangle};

/// Solid name used in ASCII output.
const SOLID_NAME: &str = "terrain";

/// STL encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StlFormat {
    /// 50 bytes per facet, little-endian `f32`.
    #[default]
    Binary,
    /// Human-readable `facet normal ... endfacet` records.
    Ascii,
}

/// Save mesh to a binary STL file.
pub fn save_stl(mesh: &TerrainMesh, path: &Path) -> TerrainResult<()> {
    save_stl_with_format(mesh, path, StlFormat::Binary)
}

/// Save mesh to an STL file in the given encoding.
///
/// # Errors
///
/// - [`TerrainError::EmptyMesh`] if the mesh has no triangles; no file is
///   created.
/// - [`TerrainError::IoWrite`] if the destination cannot be created or
///   written; the destination is left untouched.
pub fn save_stl_with_format(
    mesh: &TerrainMesh,
    path: &Path,
    format: StlFormat,
) -> TerrainResult<()> {
    if mesh.is_empty() {
        return Err(TerrainError::empty_mesh(format!(
            "refusing to write {:?} with no triangles",
            path
        )));
    }

    info!("Saving mesh to {:?} ({:?} STL)", path, format);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = staging_file(path, dir).map_err(|e| TerrainError::io_write(path, e))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let written = match format {
            StlFormat::Binary => write_binary(mesh, &mut writer),
            StlFormat::Ascii => write_ascii(mesh, &mut writer),
        };
        written
            .and_then(|()| writer.flush())
            .map_err(|e| TerrainError::io_write(path, e))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(|e| TerrainError::io_write(path, e))?;
    tmp.persist(path)
        .map_err(|e| TerrainError::io_write(path, e.error))?;

    info!("Saved {} triangles to {:?}", mesh.triangle_count(), path);

    Ok(())
}

/// Temporary file that ends up with the permissions a plain create would
/// give, or those of the file it replaces.
fn staging_file(path: &Path, dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".terrain-").suffix(".tmp");
    // 0o666 is filtered through the umask on open, like File::create.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;

    match fs::metadata(path) {
        Ok(existing) if existing.is_file() => {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
        _ => {}
    }
    Ok(tmp)
}

fn to_stl_triangle(tri: &Triangle) -> stl_io::Triangle {
    let n = tri.normal();
    let [a, b, c] = tri.vertices;
    stl_io::Triangle {
        normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
        vertices: [
            stl_io::Vertex::new([a.x as f32, a.y as f32, a.z as f32]),
            stl_io::Vertex::new([b.x as f32, b.y as f32, b.z as f32]),
            stl_io::Vertex::new([c.x as f32, c.y as f32, c.z as f32]),
        ],
    }
}

fn write_binary<W: Write>(mesh: &TerrainMesh, writer: &mut W) -> std::io::Result<()> {
    let triangles: Vec<stl_io::Triangle> = mesh.triangles.iter().map(to_stl_triangle).collect();
    stl_io::write_stl(writer, triangles.iter())
}

fn write_ascii<W: Write>(mesh: &TerrainMesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "solid {}", SOLID_NAME)?;
    for tri in &mesh.triangles {
        let n = tri.normal();
        writeln!(
            writer,
            "  facet normal {} {} {}",
            n.x as f32, n.y as f32, n.z as f32
        )?;
        writeln!(writer, "    outer loop")?;
        for v in &tri.vertices {
            writeln!(
                writer,
                "      vertex {} {} {}",
                v.x as f32, v.y as f32, v.z as f32
            )?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {}", SOLID_NAME)
}

/// Load an STL file (binary or ASCII) as a triangle soup in file order.
///
/// # Errors
///
/// - [`TerrainError::UnsupportedFormat`] if the extension is not `.stl`.
/// - [`TerrainError::IoRead`] if the file cannot be opened.
/// - [`TerrainError::ParseError`] if the contents are not valid STL.
pub fn load_stl(path: &Path) -> TerrainResult<TerrainMesh> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    if extension.as_deref() != Some("stl") {
        return Err(TerrainError::UnsupportedFormat { extension });
    }

    info!("Loading mesh from {:?}", path);

    let file = File::open(path).map_err(|e| TerrainError::io_read(path, e))?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader)
        .map_err(|e| TerrainError::parse_error(path, e.to_string()))?;

    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let point = |i: usize| -> TerrainResult<Point3<f64>> {
        let v = stl.vertices.get(i).ok_or_else(|| {
            TerrainError::parse_error(path, format!("facet references missing vertex {}", i))
        })?;
        Ok(Point3::new(v.0[0] as f64, v.0[1] as f64, v.0[2] as f64))
    };

    let mut mesh = TerrainMesh::with_capacity(stl.faces.len());
    for face in &stl.faces {
        let [a, b, c] = face.vertices;
        mesh.triangles
            .push(Triangle::new(point(a)?, point(b)?, point(c)?));
    }

    Ok(mesh)
}
