/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It divides the toroidal world into a uniform grid of cells, buckets every
 * boid index into the cell under its position, and answers radius queries by
 * scanning only the block of cells around the query point.
 *
 * Notes:
 * - Cells tile the world exactly, so cell width/height are at least the
 *   requested cell size and a 3x3 block covers any radius up to that size
 * - Cell lookups wrap modulo the grid dimensions, matching the position wrap
 * - Bucket vectors are reused between rebuilds to avoid reallocations
 */

use glam::Vec2;

use crate::torus;

/// A boid found by a radius query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance_squared: f32,
    /// Shortest vector from the query point to this boid.
    pub offset: Vec2,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: usize,
    rows: usize,
    cell_width: f32,
    cell_height: f32,
    width: f32,
    height: f32,
    cells: Vec<Vec<usize>>,
    len: usize,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialGrid {
    /// An empty one-cell grid; the first `rebuild` gives it its real shape.
    pub fn new() -> Self {
        Self {
            cell_size: 1.0,
            columns: 1,
            rows: 1,
            cell_width: 1.0,
            cell_height: 1.0,
            width: 1.0,
            height: 1.0,
            cells: vec![Vec::new()],
            len: 0,
        }
    }

    /// Cell size requested by the last rebuild. Actual cells may be wider.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// (columns, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Number of boids bucketed by the last rebuild.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Recompute the cell layout; only reallocates buckets when the cell count changes.
    fn reshape(&mut self, width: f32, height: f32, cell_size: f32, max_dimension: usize) {
        let max_dimension = max_dimension.max(1);
        let columns = ((width / cell_size).floor() as usize).clamp(1, max_dimension);
        let rows = ((height / cell_size).floor() as usize).clamp(1, max_dimension);

        if columns != self.columns || rows != self.rows {
            tracing::debug!(columns, rows, cell_size, "reshaping spatial grid");
            self.cells.resize_with(columns * rows, Vec::new);
        }

        self.cell_size = cell_size;
        self.columns = columns;
        self.rows = rows;
        self.cell_width = width / columns as f32;
        self.cell_height = height / rows as f32;
        self.width = width;
        self.height = height;
    }

    /// Clear and re-bucket every position. Index `i` in `positions` is boid `i`.
    pub fn rebuild(
        &mut self,
        positions: &[Vec2],
        width: f32,
        height: f32,
        cell_size: f32,
        max_dimension: usize,
    ) {
        self.reshape(width, height, cell_size, max_dimension);

        for cell in &mut self.cells {
            cell.clear();
        }

        for (index, &position) in positions.iter().enumerate() {
            let (x, y) = self.cell_coords(position);
            self.cells[y * self.columns + x].push(index);
        }
        self.len = positions.len();
    }

    /// Cell containing `position`, after wrapping it into the world.
    #[inline]
    pub fn cell_coords(&self, position: Vec2) -> (usize, usize) {
        let wrapped = torus::wrap_position(position, self.width, self.height);
        let x = ((wrapped.x / self.cell_width) as usize).min(self.columns - 1);
        let y = ((wrapped.y / self.cell_height) as usize).min(self.rows - 1);
        (x, y)
    }

    pub fn cell(&self, x: usize, y: usize) -> &[usize] {
        &self.cells[y * self.columns + x]
    }

    /// Append every boid within `radius` of `center` (inclusive, shortest
    /// toroidal distance) to `out`, skipping `exclude`.
    ///
    /// `positions` must be the slice the grid was last rebuilt from.
    pub fn query_into(
        &self,
        center: Vec2,
        radius: f32,
        positions: &[Vec2],
        exclude: Option<usize>,
        out: &mut Vec<Neighbor>,
    ) {
        let radius = radius.max(0.0);
        let radius_squared = radius * radius;
        let (cx, cy) = self.cell_coords(center);

        let reach_x = (radius / self.cell_width).ceil() as usize;
        let reach_y = (radius / self.cell_height).ceil() as usize;

        for y in axis_span(cy, reach_y, self.rows) {
            let row = y * self.columns;
            for x in axis_span(cx, reach_x, self.columns) {
                for &index in &self.cells[row + x] {
                    if Some(index) == exclude {
                        continue;
                    }
                    let offset = torus::toroidal_delta(center, positions[index], self.width, self.height);
                    let distance_squared = offset.length_squared();
                    if distance_squared <= radius_squared {
                        out.push(Neighbor { index, distance_squared, offset });
                    }
                }
            }
        }
    }

    pub fn query(
        &self,
        center: Vec2,
        radius: f32,
        positions: &[Vec2],
        exclude: Option<usize>,
    ) -> Vec<Neighbor> {
        let mut result = Vec::new();
        self.query_into(center, radius, positions, exclude, &mut result);
        result
    }
}

// Cell indices along one axis within `reach` of `center`, wrapping around.
// Each index is yielded once even when the block is wider than the grid.
#[inline]
fn axis_span(center: usize, reach: usize, len: usize) -> impl Iterator<Item = usize> {
    let full = reach.saturating_mul(2).saturating_add(1) >= len;
    let count = if full { len } else { 2 * reach + 1 };
    let start = if full { 0 } else { center + len - reach };
    (0..count).map(move |step| (start + step) % len)
}

/// O(n) scan with the same filter as `SpatialGrid::query_into`.
pub fn brute_force_query_into(
    center: Vec2,
    radius: f32,
    positions: &[Vec2],
    width: f32,
    height: f32,
    exclude: Option<usize>,
    out: &mut Vec<Neighbor>,
) {
    let radius = radius.max(0.0);
    let radius_squared = radius * radius;

    for (index, &position) in positions.iter().enumerate() {
        if Some(index) == exclude {
            continue;
        }
        let offset = torus::toroidal_delta(center, position, width, height);
        let distance_squared = offset.length_squared();
        if distance_squared <= radius_squared {
            out.push(Neighbor { index, distance_squared, offset });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_indices(neighbors: &[Neighbor]) -> Vec<usize> {
        let mut indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        indices.sort_unstable();
        indices
    }

    #[test]
    fn cells_tile_the_world_exactly() {
        let mut grid = SpatialGrid::new();
        grid.rebuild(&[], 800.0, 600.0, 100.0, 512);
        assert_eq!(grid.dimensions(), (8, 6));
        assert_eq!(grid.cell_size(), 100.0);

        // 650 / 100 floors to 6 columns of ~108.3; the requested size is kept
        grid.rebuild(&[], 650.0, 600.0, 100.0, 512);
        assert_eq!(grid.dimensions(), (6, 6));
        assert_eq!(grid.cell_size(), 100.0);
    }

    #[test]
    fn tiny_cells_are_capped() {
        let mut grid = SpatialGrid::new();
        grid.rebuild(&[], 800.0, 600.0, 0.01, 64);
        assert_eq!(grid.dimensions(), (64, 64));
    }

    #[test]
    fn cell_larger_than_world_gives_single_cell() {
        let mut grid = SpatialGrid::new();
        grid.rebuild(&[Vec2::new(10.0, 10.0)], 800.0, 600.0, 5000.0, 512);
        assert_eq!(grid.dimensions(), (1, 1));
        assert_eq!(grid.cell(0, 0), &[0]);
    }

    #[test]
    fn rebuild_buckets_by_position() {
        let positions = vec![Vec2::new(50.0, 50.0), Vec2::new(150.0, 50.0), Vec2::new(55.0, 40.0)];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&positions, 800.0, 600.0, 100.0, 512);

        assert_eq!(grid.len(), 3);
        assert_eq!(grid.cell(0, 0), &[0, 2]);
        assert_eq!(grid.cell(1, 0), &[1]);
    }

    #[test]
    fn rebuild_forgets_previous_positions() {
        let mut grid = SpatialGrid::new();
        grid.rebuild(&[Vec2::new(50.0, 50.0)], 800.0, 600.0, 100.0, 512);
        grid.rebuild(&[Vec2::new(750.0, 550.0)], 800.0, 600.0, 100.0, 512);
        assert!(grid.cell(0, 0).is_empty());
        assert_eq!(grid.cell(7, 5), &[0]);
    }

    #[test]
    fn out_of_bounds_positions_bucket_where_they_will_wrap() {
        let mut grid = SpatialGrid::new();
        grid.rebuild(&[Vec2::new(850.0, -10.0)], 800.0, 600.0, 100.0, 512);
        assert_eq!(grid.cell_coords(Vec2::new(850.0, -10.0)), (0, 5));
        assert_eq!(grid.cell(0, 5), &[0]);
    }

    #[test]
    fn query_filters_by_true_distance() {
        let positions = vec![
            Vec2::new(400.0, 300.0),
            Vec2::new(450.0, 300.0),
            Vec2::new(490.0, 390.0),
            Vec2::new(400.0, 399.0),
        ];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&positions, 800.0, 600.0, 100.0, 512);

        let found = grid.query(positions[0], 100.0, &positions, Some(0));
        // (490, 390) is ~127 away even though its cell is adjacent
        assert_eq!(sorted_indices(&found), vec![1, 3]);
    }

    #[test]
    fn query_radius_is_inclusive() {
        let positions = vec![Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&positions, 800.0, 600.0, 100.0, 512);
        let found = grid.query(positions[0], 100.0, &positions, Some(0));
        assert_eq!(sorted_indices(&found), vec![1]);
    }

    #[test]
    fn query_sees_across_the_seam() {
        let positions = vec![
            Vec2::new(5.0, 300.0),
            Vec2::new(795.0, 300.0),
            Vec2::new(5.0, 595.0),
            Vec2::new(795.0, 5.0),
        ];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&positions, 800.0, 600.0, 100.0, 512);

        let found = grid.query(positions[0], 100.0, &positions, Some(0));
        assert_eq!(sorted_indices(&found), vec![1]);
        let neighbor = found[0];
        assert!((neighbor.offset.x + 10.0).abs() < 1e-4);
        assert!((neighbor.distance_squared - 100.0).abs() < 1e-2);

        // Corner to corner wraps on both axes
        let found = grid.query(positions[2], 100.0, &positions, Some(2));
        assert_eq!(sorted_indices(&found), vec![3]);
    }

    #[test]
    fn large_radius_visits_each_cell_once() {
        let positions: Vec<Vec2> = (0..8).map(|i| Vec2::new(i as f32 * 100.0 + 50.0, 50.0)).collect();
        let mut grid = SpatialGrid::new();
        grid.rebuild(&positions, 800.0, 600.0, 100.0, 512);

        let found = grid.query(Vec2::new(50.0, 50.0), 10_000.0, &positions, None);
        assert_eq!(sorted_indices(&found), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn radius_beyond_one_cell_extends_the_block() {
        let positions = vec![Vec2::new(50.0, 50.0), Vec2::new(300.0, 50.0)];
        let mut grid = SpatialGrid::new();
        grid.rebuild(&positions, 800.0, 600.0, 100.0, 512);
        let found = grid.query(positions[0], 260.0, &positions, Some(0));
        assert_eq!(sorted_indices(&found), vec![1]);
    }

    #[test]
    fn grid_matches_brute_force() {
        let positions: Vec<Vec2> = (0..200)
            .map(|i| {
                let t = i as f32;
                Vec2::new((t * 37.7) % 800.0, (t * 91.3) % 600.0)
            })
            .collect();
        let mut grid = SpatialGrid::new();
        grid.rebuild(&positions, 800.0, 600.0, 60.0, 512);

        for (i, &center) in positions.iter().enumerate().step_by(7) {
            let from_grid = grid.query(center, 60.0, &positions, Some(i));
            let mut brute = Vec::new();
            brute_force_query_into(center, 60.0, &positions, 800.0, 600.0, Some(i), &mut brute);
            assert_eq!(sorted_indices(&from_grid), sorted_indices(&brute));
        }
    }

    #[test]
    fn axis_span_wraps_and_dedupes() {
        assert_eq!(axis_span(0, 1, 8).collect::<Vec<_>>(), vec![7, 0, 1]);
        assert_eq!(axis_span(7, 1, 8).collect::<Vec<_>>(), vec![6, 7, 0]);
        assert_eq!(axis_span(1, 2, 3).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(axis_span(0, 0, 1).collect::<Vec<_>>(), vec![0]);
    }
}
