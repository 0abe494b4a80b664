//! Tracing extensions for terrain operations.
//!
//! Enable output by installing a subscriber in the application:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=terrain_mesh=debug for detailed output
//! // RUST_LOG=terrain_mesh::timing=info for operation timing
//! ```
//!
//! # Log Levels
//!
//! - **WARN**: Suspicious input (flat rasters, tiny outputs)
//! - **INFO**: Operation summaries and timing
//! - **DEBUG**: Dimensions, counts, intermediate states
//! - **TRACE**: Bounding boxes and per-stage detail

use std::time::Instant;
use tracing::span::EnteredSpan;
use tracing::{debug, info, info_span, trace};

use crate::heightfield::HeightField;
use crate::types::TerrainMesh;

/// Times one stage over a `rows x cols` grid.
///
/// The `terrain_stage` span stays entered while the timer is alive, so events
/// logged during the stage carry the stage name and grid size. Elapsed time is
/// logged on drop.
///
/// ```rust,ignore
/// let _timer = OperationTimer::with_context("triangulate", rows, cols);
/// // ... work logged inside the stage span ...
/// ```
pub struct OperationTimer {
    name: &'static str,
    rows: usize,
    cols: usize,
    start: Instant,
    _stage: EnteredSpan,
}

impl OperationTimer {
    /// Enter the stage span and start timing.
    pub fn with_context(name: &'static str, rows: usize, cols: usize) -> Self {
        let stage = info_span!("terrain_stage", stage = name, rows = rows, cols = cols).entered();
        debug!(target: "terrain_mesh::timing", "Starting {}", name);
        Self {
            name,
            rows,
            cols,
            start: Instant::now(),
            _stage: stage,
        }
    }

    /// Milliseconds since the stage started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let cells = self.rows.saturating_mul(self.cols);
        info!(
            target: "terrain_mesh::timing",
            elapsed_ms = format!("{:.2}", self.elapsed_ms()),
            cells = cells,
            "{} finished",
            self.name
        );
    }
}

/// Log height field statistics at debug level.
pub fn log_height_field_stats(field: &HeightField, context: &str) {
    let (lo, hi) = field.z_range();
    debug!(
        target: "terrain_mesh::state",
        context = context,
        rows = field.rows(),
        cols = field.cols(),
        height_scale = field.height_scale(),
        z_min = format!("{:.3}", lo),
        z_max = format!("{:.3}", hi),
        "Height field state"
    );
}

/// Log mesh statistics at debug level, with the bounding box at trace level.
pub fn log_mesh_stats(mesh: &TerrainMesh, context: &str) {
    debug!(
        target: "terrain_mesh::state",
        context = context,
        triangles = mesh.triangle_count(),
        "Mesh state"
    );

    if let Some((min, max)) = mesh.bounds() {
        trace!(
            target: "terrain_mesh::state",
            context = context,
            min = format!("({:.3}, {:.3}, {:.3})", min.x, min.y, min.z),
            max = format!("({:.3}, {:.3}, {:.3})", max.x, max.y, max.z),
            "Mesh bounds"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageGrid;

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = OperationTimer::with_context("test_op", 4, 3);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_ms() >= 5.0);
    }

    #[test]
    fn test_stage_span_entered_while_timing() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let timer = OperationTimer::with_context("stage_under_test", 2, 3);
            let current = tracing::Span::current();
            assert_eq!(current.metadata().map(|m| m.name()), Some("terrain_stage"));
            drop(timer);
            assert!(tracing::Span::current().metadata().is_none());
        });
    }

    #[test]
    fn test_logging_helpers_accept_empty_inputs() {
        log_mesh_stats(&TerrainMesh::new(), "empty");

        let grid = ImageGrid::new(1, 1, vec![3.0]).unwrap();
        let field = HeightField::build(&grid, 1.0).unwrap();
        log_height_field_stats(&field, "single pixel");
    }
}
