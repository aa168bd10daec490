use crate::algorithm::{distance, search_bound, NearestPointResolver};
use crate::bounds::BoundingBox;
use crate::point::PointSet;
use serde::{Deserialize, Serialize};

/// Marks a cell no point was written to.
const EMPTY: usize = usize::MAX;

/// Settings for [`GridIndex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells along each axis. Values below 2 are raised to 2.
    pub resolution: usize,
    /// Each point is written to the `(2r - 1) x (2r - 1)` cells around its own.
    pub splat_radius: usize,
    /// Check the real distance against `max_distance` in `query`.
    pub filter_by_distance: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 500,
            splat_radius: 6,
            filter_by_distance: false,
        }
    }
}

/// Maps one coordinate axis onto continuous cell coordinates `[0, D - 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisMapping {
    /// `cell = (v - min) * scale`.
    Linear { min: f64, scale: f64 },
    /// A zero-length axis. Coordinates within `slack` of `at` land on the middle cell.
    Constant { at: f64, cell: f64, slack: f64 },
}

impl AxisMapping {
    fn new(min: f64, max: f64, resolution: usize) -> Self {
        let last = (resolution - 1) as f64;
        if max > min {
            AxisMapping::Linear { min, scale: last / (max - min) }
        } else {
            AxisMapping::Constant { at: min, cell: last / 2.0, slack: 0.0 }
        }
    }

    /// Continuous cell coordinate of `v`, if the axis accepts it.
    pub fn map(&self, v: f64) -> Option<f64> {
        match *self {
            AxisMapping::Linear { min, scale } => Some((v - min) * scale),
            AxisMapping::Constant { at, cell, slack } => ((v - at).abs() <= slack).then_some(cell),
        }
    }

    /// Width of one cell in data units, `None` on a zero-length axis.
    fn cell_size(&self) -> Option<f64> {
        match *self {
            AxisMapping::Linear { scale, .. } => Some(1.0 / scale),
            AxisMapping::Constant { .. } => None,
        }
    }
}

/// An approximate nearest-point lookup table over a fixed `D x D` grid.
///
/// Every point writes its id into a square of cells around the cell it falls in.
/// Later points overwrite earlier ones where squares overlap, so a lookup is O(1)
/// but may hand back a nearby point that is not the nearest. Whatever it returns
/// lies within [`GridIndex::error_bound`] of the query.
#[derive(Clone, Debug)]
pub struct GridIndex {
    /// Number of cells along each axis.
    pub resolution: usize,
    /// Splat radius used while building.
    pub splat_radius: usize,
    /// Mapping from X coordinate to column.
    pub map_x: AxisMapping,
    /// Mapping from Y coordinate to row.
    pub map_y: AxisMapping,
    /// Row-major cells, `cells[col + row * resolution]`.
    cells: Vec<usize>,
    /// Copy of the coordinates by id, kept when filtering by distance.
    positions: Option<Vec<[f64; 2]>>,
    count: usize,
}

impl GridIndex {
    /// Builds the grid over `points` with the given settings.
    pub fn with_config(points: &PointSet, config: GridConfig) -> Self {
        let resolution = config.resolution.max(2);
        let (map_x, map_y) = Self::mappings(points.bounds(), resolution, config.splat_radius);

        let mut grid = GridIndex {
            resolution,
            splat_radius: config.splat_radius,
            map_x,
            map_y,
            cells: vec![EMPTY; resolution * resolution],
            positions: None,
            count: points.len(),
        };

        let reach = config.splat_radius as isize - 1;
        let n = resolution as isize;
        for p in points {
            let (Some(cx), Some(cy)) = (map_x.map(p.x), map_y.map(p.y)) else {
                continue;
            };
            let i = cx.round() as isize;
            let j = cy.round() as isize;

            for row in (j - reach).max(0)..=(j + reach).min(n - 1) {
                for col in (i - reach).max(0)..=(i + reach).min(n - 1) {
                    grid.cells[col as usize + row as usize * resolution] = p.id;
                }
            }
        }

        if config.filter_by_distance {
            let mut positions = vec![[0.0; 2]; points.len()];
            for p in points {
                positions[p.id] = p.position();
            }
            grid.positions = Some(positions);
        }

        log::debug!(
            "GridIndex: built {}x{} cells over {} points (splat radius {})",
            resolution,
            resolution,
            points.len(),
            config.splat_radius
        );
        grid
    }

    fn mappings(bounds: &BoundingBox<2>, resolution: usize, splat_radius: usize) -> (AxisMapping, AxisMapping) {
        let mut map_x = AxisMapping::new(bounds.min[0], bounds.max[0], resolution);
        let mut map_y = AxisMapping::new(bounds.min[1], bounds.max[1], resolution);

        // A zero-length axis borrows the cell size of the other one, so a match
        // stays within the same error bound as on a regular grid.
        let reach_x = map_x.cell_size().map(|s| s * splat_radius as f64);
        let reach_y = map_y.cell_size().map(|s| s * splat_radius as f64);
        if let (AxisMapping::Constant { slack, .. }, Some(reach)) = (&mut map_x, reach_y) {
            *slack = reach;
        }
        if let (AxisMapping::Constant { slack, .. }, Some(reach)) = (&mut map_y, reach_x) {
            *slack = reach;
        }
        if bounds.is_degenerate() {
            log::debug!("GridIndex: degenerate bounds {:?}, using the middle cell", bounds);
        }
        (map_x, map_y)
    }

    /// Id stored in the cell `(x, y)` rounds to, without any distance check.
    pub fn lookup(&self, x: f64, y: f64) -> Option<usize> {
        let col = self.cell_of(self.map_x.map(x)?)?;
        let row = self.cell_of(self.map_y.map(y)?)?;
        match self.cells[col + row * self.resolution] {
            EMPTY => None,
            id => Some(id),
        }
    }

    fn cell_of(&self, c: f64) -> Option<usize> {
        let c = c.round();
        // Also rejects NaN.
        if c >= 0.0 && c <= (self.resolution - 1) as f64 {
            Some(c as usize)
        } else {
            None
        }
    }

    /// Diagonal of one cell in data units.
    ///
    /// A zero-length axis takes the cell size of the other axis; the diagonal is
    /// 0 when both are zero-length.
    pub fn cell_diagonal(&self) -> f64 {
        let (sx, sy) = match (self.map_x.cell_size(), self.map_y.cell_size()) {
            (Some(sx), Some(sy)) => (sx, sy),
            (Some(s), None) | (None, Some(s)) => (s, s),
            (None, None) => (0.0, 0.0),
        };
        sx.hypot(sy)
    }

    /// Largest possible distance between a query and the point `lookup` returns.
    pub fn error_bound(&self) -> f64 {
        self.cell_diagonal() * self.splat_radius as f64
    }
}

impl NearestPointResolver for GridIndex {
    fn build(points: &PointSet) -> Self {
        Self::with_config(points, GridConfig::default())
    }

    /// Grid lookup. `max_distance` is only checked when the grid was built with
    /// `filter_by_distance`.
    fn query(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        let id = self.lookup(x, y)?;
        match &self.positions {
            Some(positions) => {
                let bound = search_bound(max_distance)?;
                (distance(&positions[id], &[x, y]) < bound).then_some(id)
            }
            None => Some(id),
        }
    }

    fn len(&self) -> usize {
        self.count
    }
}
