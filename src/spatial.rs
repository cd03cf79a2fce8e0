//! Uniform bucket grid over one population, rebuilt every tick.
//!
//! Buckets are stored flat: `[offset, count]` per cell pointing into a single
//! index array (a counting sort by cell). The grid keeps a copy of the
//! positions it was built from and answers queries against that copy only.
//!
//! Out-of-range cell coordinates are clamped, not wrapped, and neighbour
//! scans never cross a domain edge, even though agents themselves wrap
//! toroidally. Agents near an edge therefore do not see neighbours on the
//! other side of the seam.

use crate::agent::Agent;
use glam::Vec2;

pub type GridKey = (i32, i32);

// Bucket count is capped at this many cells per entity (never below
// MIN_CELL_BUDGET); tiny cell sizes are widened to fit.
const CELLS_PER_ENTITY: usize = 4;
const MIN_CELL_BUDGET: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: i32,
    rows: i32,
    positions: Vec<Vec2>,
    cell_offsets: Vec<[u32; 2]>,
    cell_indices: Vec<u32>,
    // Write cursor per cell, only used while rebuilding
    fill_cursor: Vec<u32>,
}

impl SpatialGrid {
    pub fn build(entities: &[Agent], width: f32, height: f32, cell_size: f32) -> Self {
        let mut grid = Self::default();
        grid.rebuild(entities, width, height, cell_size);
        grid
    }

    /// Re-buckets `entities`, reusing this grid's allocations.
    ///
    /// A non-positive cell size collapses the grid into one bucket covering
    /// the whole domain. A cell size so small that the bucket count would
    /// exceed the cell budget is widened until it fits.
    pub fn rebuild(&mut self, entities: &[Agent], width: f32, height: f32, cell_size: f32) {
        let (cell_size, cols, rows) = fit_cells(width, height, cell_size, entities.len());
        self.cell_size = cell_size;
        self.cols = cols;
        self.rows = rows;
        let num_cells = cols as usize * rows as usize;

        self.positions.clear();
        self.positions.extend(entities.iter().map(|entity| entity.position));

        // Count per cell
        self.cell_offsets.clear();
        self.cell_offsets.resize(num_cells, [0, 0]);
        for position in &self.positions {
            let flat = self.flat_index(self.get_grid_key(*position));
            self.cell_offsets[flat][1] += 1;
        }

        // Exclusive prefix sum gives each cell its offset
        let mut current_offset = 0u32;
        for cell in &mut self.cell_offsets {
            cell[0] = current_offset;
            current_offset += cell[1];
        }

        // Scatter indices into their cells
        self.cell_indices.clear();
        self.cell_indices.resize(self.positions.len(), 0);
        self.fill_cursor.clear();
        self.fill_cursor.extend(self.cell_offsets.iter().map(|cell| cell[0]));
        for (index, position) in self.positions.iter().enumerate() {
            let flat = self.flat_index(self.get_grid_key(*position));
            let slot = self.fill_cursor[flat] as usize;
            self.cell_indices[slot] = index as u32;
            self.fill_cursor[flat] += 1;
        }
    }

    #[inline]
    pub fn get_grid_key(&self, position: Vec2) -> GridKey {
        let cell_x = (position.x / self.cell_size).floor() as i32;
        let cell_y = (position.y / self.cell_size).floor() as i32;
        (
            cell_x.clamp(0, self.cols - 1),
            cell_y.clamp(0, self.rows - 1),
        )
    }

    #[inline]
    fn flat_index(&self, (cell_x, cell_y): GridKey) -> usize {
        (cell_x + cell_y * self.cols) as usize
    }

    /// Fills `out` with every other index within `search_radius` (strict) of
    /// `index`. Does not allocate once `out` has grown to the population size.
    ///
    /// Scans the 3x3 block around the entity's cell when the radius fits in
    /// one cell, otherwise enough rings of cells to cover the radius.
    ///
    /// Panics if `index` is not part of the population the grid was built from.
    pub fn query_into(&self, index: usize, search_radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let origin = self.positions[index];
        let radius_sq = search_radius * search_radius;
        let (cell_x, cell_y) = self.get_grid_key(origin);

        let reach = if search_radius <= self.cell_size {
            1
        } else {
            ((search_radius / self.cell_size).ceil() as i32).min(self.cols.max(self.rows))
        };

        for cx in (cell_x - reach).max(0)..=(cell_x + reach).min(self.cols - 1) {
            for cy in (cell_y - reach).max(0)..=(cell_y + reach).min(self.rows - 1) {
                let [offset, count] = self.cell_offsets[self.flat_index((cx, cy))];
                let bucket = &self.cell_indices[offset as usize..(offset + count) as usize];
                for &other in bucket {
                    let other = other as usize;
                    if other == index {
                        continue;
                    }
                    if (self.positions[other] - origin).length_squared() < radius_sq {
                        out.push(other);
                    }
                }
            }
        }
    }

    pub fn query(&self, index: usize, search_radius: f32) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(index, search_radius, &mut out);
        out
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn get_grid_dimensions(&self) -> (i32, i32) {
        (self.cols, self.rows)
    }

    // --- Flat bucket layout, for debug overlays ---
    #[inline]
    pub fn cell_offsets(&self) -> &[[u32; 2]] {
        &self.cell_offsets
    }

    #[inline]
    pub fn cell_indices(&self) -> &[u32] {
        &self.cell_indices
    }
}

/// Returns `(cell_size, cols, rows)` with `cols * rows` within the cell
/// budget for `population` entities.
fn fit_cells(width: f32, height: f32, cell_size: f32, population: usize) -> (f32, i32, i32) {
    if !(cell_size > 0.0 && cell_size.is_finite()) {
        return (width.max(height).max(f32::MIN_POSITIVE), 1, 1);
    }
    let budget = population.saturating_mul(CELLS_PER_ENTITY).max(MIN_CELL_BUDGET) as f64;
    let mut size = cell_size;
    loop {
        let cols = (width / size).ceil().max(1.0);
        let rows = (height / size).ceil().max(1.0);
        let cells = cols as f64 * rows as f64;
        if cells <= budget {
            return (size, cols as i32, rows as i32);
        }
        size *= ((cells / budget).sqrt() as f32).max(1.1);
    }
}
