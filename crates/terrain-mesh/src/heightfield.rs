//! Height field construction from an intensity grid.
//!
//! Each pixel becomes one point: `x` is the column, `y` is the row and `z` is
//! the sample scaled linearly so that the grid's max intensity lands on
//! `height_scale`. Spacing is one unit per pixel; no geographic units are
//! applied at this layer.

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::error::{TerrainError, TerrainResult};
use crate::tracing_ext::OperationTimer;
use crate::types::ImageGrid;

/// A row-major grid of 3D points, one per source pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    rows: usize,
    cols: usize,
    height_scale: f64,
    points: Vec<Point3<f64>>,
}

impl HeightField {
    /// Build a height field from `grid`, mapping `[0, max_intensity]` onto
    /// `[0, height_scale]`.
    ///
    /// Heights are `sample / max_intensity * height_scale`, in that order.
    /// Fixtures that compare exact values must divide first as well, since
    /// `sample * height_scale / max_intensity` can differ in the last bit.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidInput`] if the grid's max intensity is
    /// not a positive finite number, or if `height_scale` is not.
    ///
    /// # Example
    ///
    /// ```
    /// use terrain_mesh::{HeightField, ImageGrid};
    ///
    /// let grid = ImageGrid::from_rows(&[[0.0, 100.0], [50.0, 100.0]]).unwrap();
    /// let field = HeightField::build(&grid, 10.0).unwrap();
    /// assert_eq!(field.point(1, 0).z, 5.0);
    /// ```
    pub fn build(grid: &ImageGrid, height_scale: f64) -> TerrainResult<Self> {
        let max_intensity = grid.max_intensity();
        if !(max_intensity.is_finite() && max_intensity > 0.0) {
            return Err(TerrainError::invalid_input(format!(
                "max intensity must be positive, got {}",
                max_intensity
            )));
        }
        if !(height_scale.is_finite() && height_scale > 0.0) {
            return Err(TerrainError::invalid_input(format!(
                "height scale must be positive, got {}",
                height_scale
            )));
        }

        let (rows, cols) = (grid.height(), grid.width());
        let _timer = OperationTimer::with_context("build_height_field", rows, cols);

        let points = grid
            .samples()
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                let (row, col) = (i / cols, i % cols);
                // Dividing first keeps z <= height_scale exactly when sample == max.
                Point3::new(
                    col as f64,
                    row as f64,
                    sample / max_intensity * height_scale,
                )
            })
            .collect();

        if grid.min_intensity() == max_intensity {
            warn!(
                "Raster is flat (every sample is {}), surface will be a plane at z = {}",
                max_intensity, height_scale
            );
        }
        debug!(
            rows = rows,
            cols = cols,
            max_intensity = max_intensity,
            height_scale = height_scale,
            "Built height field"
        );

        Ok(Self {
            rows,
            cols,
            height_scale,
            points,
        })
    }

    /// Number of point rows (source image height).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of point columns (source image width).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Height that the max intensity maps onto.
    #[inline]
    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }

    /// Point at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the field.
    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point3<f64> {
        assert!(
            row < self.rows && col < self.cols,
            "point ({}, {}) outside {}x{} height field",
            row,
            col,
            self.cols,
            self.rows
        );
        self.points[row * self.cols + col]
    }

    /// Points of one row, left to right.
    #[inline]
    pub fn row(&self, row: usize) -> &[Point3<f64>] {
        &self.points[row * self.cols..(row + 1) * self.cols]
    }

    /// All points in row-major order.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Lowest and highest `z` in the field.
    pub fn z_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_by_two_scenario() {
        let grid = ImageGrid::from_rows(&[[0.0, 100.0], [50.0, 100.0]]).unwrap();
        let field = HeightField::build(&grid, 10.0).unwrap();

        assert_eq!(field.rows(), 2);
        assert_eq!(field.cols(), 2);
        assert_eq!(field.point(0, 0), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(field.point(0, 1), Point3::new(1.0, 0.0, 10.0));
        assert_eq!(field.point(1, 0), Point3::new(0.0, 1.0, 5.0));
        assert_eq!(field.point(1, 1), Point3::new(1.0, 1.0, 10.0));
    }

    #[test]
    fn test_heights_divide_before_scaling() {
        let grid = ImageGrid::with_max_intensity(2, 1, vec![128.0, 255.0], 255.0).unwrap();
        let field = HeightField::build(&grid, 10.0).unwrap();

        assert_eq!(field.height_scale(), 10.0);
        assert_eq!(field.point(0, 0).z, 128.0 / 255.0 * 10.0);
        assert_eq!(field.point(0, 1).z, 10.0);
    }

    #[test]
    fn test_dimensions_match_grid() {
        let grid = ImageGrid::new(5, 3, (0..15).map(f64::from).collect()).unwrap();
        let field = HeightField::build(&grid, 2.0).unwrap();
        assert_eq!(field.cols(), 5);
        assert_eq!(field.rows(), 3);
        assert_eq!(field.points().len(), 15);
        assert_eq!(field.row(2)[4], Point3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_zero_max_intensity_rejected() {
        let grid = ImageGrid::new(2, 2, vec![0.0; 4]).unwrap();
        let err = HeightField::build(&grid, 10.0).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidInput { .. }));
    }

    #[test]
    fn test_negative_anchor_rejected() {
        let grid = ImageGrid::with_max_intensity(1, 1, vec![0.0], -5.0).unwrap();
        assert!(HeightField::build(&grid, 10.0).is_err());

        let grid = ImageGrid::with_max_intensity(1, 1, vec![0.0], f64::NAN).unwrap();
        assert!(HeightField::build(&grid, 10.0).is_err());
    }

    #[test]
    fn test_height_scale_rejected() {
        let grid = ImageGrid::new(1, 1, vec![1.0]).unwrap();
        assert!(HeightField::build(&grid, 0.0).is_err());
        assert!(HeightField::build(&grid, -1.0).is_err());
        assert!(HeightField::build(&grid, f64::INFINITY).is_err());
    }

    #[test]
    fn test_explicit_anchor_scales_relative_to_anchor() {
        let grid = ImageGrid::with_max_intensity(2, 1, vec![64.0, 128.0], 255.0).unwrap();
        let field = HeightField::build(&grid, 10.0).unwrap();
        assert_relative_eq!(field.point(0, 1).z, 128.0 * 10.0 / 255.0);
    }

    #[test]
    fn test_z_range_within_scale() {
        let grid = ImageGrid::new(4, 1, vec![0.0, 30.0, 60.0, 120.0]).unwrap();
        let field = HeightField::build(&grid, 7.5).unwrap();
        let (lo, hi) = field.z_range();
        assert_eq!(lo, 0.0);
        assert_relative_eq!(hi, 7.5);
    }

    #[test]
    fn test_build_is_deterministic() {
        let grid = ImageGrid::new(3, 3, vec![1.0, 9.0, 4.0, 3.0, 3.0, 8.0, 0.0, 2.0, 7.0]).unwrap();
        let a = HeightField::build(&grid, 10.0).unwrap();
        let b = HeightField::build(&grid, 10.0).unwrap();
        assert_eq!(a, b);
    }
}
