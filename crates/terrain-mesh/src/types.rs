//! Core data types: the intensity grid, triangles and the triangle soup.

use nalgebra::{Point3, Vector3};

use crate::error::{TerrainError, TerrainResult};

/// A row-major grid of greyscale intensity samples.
///
/// `max_intensity` is the anchor that maps onto the full height scale. By
/// default it is the largest sample observed in the grid, so two rasters with
/// different contrast produce different absolute heights for the same pixel
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGrid {
    width: usize,
    height: usize,
    samples: Vec<f64>,
    max_intensity: f64,
}

impl ImageGrid {
    /// Create a grid from row-major samples, anchored at the observed maximum.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidInput`] if either dimension is zero,
    /// `samples.len() != width * height`, or a sample is NaN or infinite.
    pub fn new(width: usize, height: usize, samples: Vec<f64>) -> TerrainResult<Self> {
        check_samples(width, height, &samples)?;
        let max_intensity = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            width,
            height,
            samples,
            max_intensity,
        })
    }

    /// Create a grid with a caller-supplied intensity anchor.
    ///
    /// The anchor is not validated here; [`HeightField::build`] rejects a
    /// non-positive anchor.
    ///
    /// [`HeightField::build`]: crate::HeightField::build
    pub fn with_max_intensity(
        width: usize,
        height: usize,
        samples: Vec<f64>,
        max_intensity: f64,
    ) -> TerrainResult<Self> {
        check_samples(width, height, &samples)?;
        Ok(Self {
            width,
            height,
            samples,
            max_intensity,
        })
    }

    /// Create a grid from nested rows (`rows[row][col]`).
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> TerrainResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.as_ref().len() != width)
        {
            return Err(TerrainError::invalid_input(format!(
                "row {} has {} samples, expected {}",
                i,
                row.as_ref().len(),
                width
            )));
        }
        let samples = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::new(width, height, samples)
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Intensity anchor used for normalization.
    #[inline]
    pub fn max_intensity(&self) -> f64 {
        self.max_intensity
    }

    /// Smallest sample in the grid.
    pub fn min_intensity(&self) -> f64 {
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Sample at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the grid.
    #[inline]
    pub fn sample(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.height && col < self.width,
            "sample ({}, {}) outside {}x{} grid",
            row,
            col,
            self.width,
            self.height
        );
        self.samples[row * self.width + col]
    }

    /// Raw row-major samples.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

fn check_samples(width: usize, height: usize, samples: &[f64]) -> TerrainResult<()> {
    if width == 0 || height == 0 {
        return Err(TerrainError::invalid_input(format!(
            "grid dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    if width.checked_mul(height) != Some(samples.len()) {
        return Err(TerrainError::invalid_input(format!(
            "{}x{} grid needs {} samples, got {}",
            width,
            height,
            width.saturating_mul(height),
            samples.len()
        )));
    }
    if let Some(i) = samples.iter().position(|s| !s.is_finite()) {
        return Err(TerrainError::invalid_input(format!(
            "sample ({}, {}) is not a finite number",
            i / width,
            i % width
        )));
    }
    Ok(())
}

/// A triangle stored by value (no shared vertex indexing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corners in emission order.
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    /// Create a triangle from three corners.
    #[inline]
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unit facet normal by the right-hand rule; zero for degenerate triangles.
    pub fn normal(&self) -> Vector3<f64> {
        let [a, b, c] = self.vertices;
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len > f64::EPSILON {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    /// Triangle area.
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a)).norm() * 0.5
    }
}

/// An ordered triangle soup, serialized in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    /// Triangles in emission order.
    pub triangles: Vec<Triangle>,
}

impl TerrainMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(triangle_count: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.triangles.first()?.vertices[0];
        let mut min = first;
        let mut max = first;

        for p in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }
}

impl From<Vec<Triangle>> for TerrainMesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}
