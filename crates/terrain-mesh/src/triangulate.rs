//! Triangulation of a height field into a triangle soup.
//!
//! Every grid cell with four corners becomes two triangles sharing the edge
//! from `(row, col)` to `(row + 1, col + 1)`. With `y = row` pointing up in
//! mesh space, that edge is the cell's lower-left to upper-right diagonal:
//!
//! ```text
//!  y
//!  ^  (r+1,c) ---- (r+1,c+1)
//!  |     |   A    /   |
//!  |     |     /      |
//!  |     |  /     B   |
//!  |   (r,c) ----- (r,c+1)
//!  +-----------------------> x
//! ```
//!
//! - A: `(r,c), (r+1,c), (r+1,c+1)`
//! - B: `(r,c), (r,c+1), (r+1,c+1)`
//!
//! The split is fixed for every cell. Saddle-shaped cells, where the other
//! diagonal would follow the terrain better, are under-resolved; this is a
//! known limitation.
//!
//! Output order is row-major over cells with A before B in each cell. Seen
//! from `+z`, A winds clockwise and B counter-clockwise; vertex order is kept
//! exactly as listed, so facet normals of A triangles point downward.

use rayon::prelude::*;
use tracing::debug;

use crate::heightfield::HeightField;
use crate::tracing_ext::OperationTimer;
use crate::types::{TerrainMesh, Triangle};

/// Number of triangles an `rows x cols` point grid produces.
#[inline]
pub fn expected_triangle_count(rows: usize, cols: usize) -> usize {
    if rows < 2 || cols < 2 {
        0
    } else {
        2 * (rows - 1) * (cols - 1)
    }
}

/// Triangulate a height field, two triangles per cell.
///
/// Fields with fewer than two rows or columns have no complete cell and yield
/// an empty mesh.
///
/// # Example
///
/// ```
/// use terrain_mesh::{HeightField, ImageGrid, triangulate};
///
/// let grid = ImageGrid::new(3, 3, vec![1.0; 9]).unwrap();
/// let field = HeightField::build(&grid, 1.0).unwrap();
/// assert_eq!(triangulate(&field).triangle_count(), 8);
/// ```
pub fn triangulate(field: &HeightField) -> TerrainMesh {
    let _timer = OperationTimer::with_context("triangulate", field.rows(), field.cols());

    let mut mesh = TerrainMesh::with_capacity(expected_triangle_count(field.rows(), field.cols()));
    for row in 0..field.rows().saturating_sub(1) {
        push_row_triangles(field, row, &mut mesh.triangles);
    }

    debug!("Triangulated {} triangles", mesh.triangle_count());
    mesh
}

/// Parallel variant of [`triangulate`], producing the same triangles in the
/// same order.
pub fn triangulate_par(field: &HeightField) -> TerrainMesh {
    let _timer = OperationTimer::with_context("triangulate_par", field.rows(), field.cols());

    let rows: Vec<Vec<Triangle>> = (0..field.rows().saturating_sub(1))
        .into_par_iter()
        .map(|row| {
            let mut out = Vec::with_capacity(2 * field.cols().saturating_sub(1));
            push_row_triangles(field, row, &mut out);
            out
        })
        .collect();

    let mut mesh = TerrainMesh::with_capacity(expected_triangle_count(field.rows(), field.cols()));
    for row in rows {
        mesh.triangles.extend(row);
    }

    debug!("Triangulated {} triangles (parallel)", mesh.triangle_count());
    mesh
}

fn push_row_triangles(field: &HeightField, row: usize, out: &mut Vec<Triangle>) {
    let top = field.row(row);
    let bottom = field.row(row + 1);
    for col in 0..field.cols().saturating_sub(1) {
        out.push(Triangle::new(top[col], bottom[col], bottom[col + 1]));
        out.push(Triangle::new(top[col], top[col + 1], bottom[col + 1]));
    }
}
