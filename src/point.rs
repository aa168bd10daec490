use crate::bounds::BoundingBox;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fmt;

/// A 2D node position. `id` is the only value handed back to callers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Reasons a point set is refused.
#[derive(Clone, Debug, PartialEq)]
pub enum PointSetError {
    /// Two points share the same id.
    DuplicateId(usize),
    /// Ids must be dense: every id lies in `[0, len)`.
    IdOutOfRange { id: usize, len: usize },
    /// A coordinate is NaN or infinite.
    NonFiniteCoordinate { id: usize },
    /// A point lies outside the bounds supplied with it.
    OutsideBounds { id: usize },
    /// Bounds are not finite or have `min > max`.
    InvalidBounds,
    /// A flat coordinate slice must hold `x, y` pairs.
    OddCoordinateCount(usize),
}

impl fmt::Display for PointSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointSetError::DuplicateId(id) => write!(f, "duplicate point id {}", id),
            PointSetError::IdOutOfRange { id, len } => {
                write!(f, "point id {} out of range for {} points", id, len)
            }
            PointSetError::NonFiniteCoordinate { id } => {
                write!(f, "point {} has a non-finite coordinate", id)
            }
            PointSetError::OutsideBounds { id } => {
                write!(f, "point {} lies outside the bounding box", id)
            }
            PointSetError::InvalidBounds => write!(f, "bounding box is not finite or inverted"),
            PointSetError::OddCoordinateCount(n) => {
                write!(f, "expected x, y pairs but got {} coordinates", n)
            }
        }
    }
}

impl std::error::Error for PointSetError {}

/// An immutable, validated set of points with its bounding box.
///
/// Index structures copy what they need out of a `PointSet` while building and
/// never hold on to it.
#[derive(Clone, Debug)]
pub struct PointSet {
    points: Vec<Point>,
    bounds: BoundingBox<2>,
}

impl PointSet {
    /// Validates `points` and computes their bounding box.
    pub fn new(points: Vec<Point>) -> Result<Self, PointSetError> {
        validate_ids(&points)?;
        let bounds = BoundingBox::from_points(points.iter().map(Point::position));
        Ok(Self { points, bounds })
    }

    /// Validates `points` against a bounding box supplied by the caller.
    pub fn with_bounds(points: Vec<Point>, bounds: BoundingBox<2>) -> Result<Self, PointSetError> {
        if !bounds.is_valid() {
            return Err(PointSetError::InvalidBounds);
        }
        validate_ids(&points)?;
        if let Some(p) = points.iter().find(|p| !bounds.contains(&p.position())) {
            return Err(PointSetError::OutsideBounds { id: p.id });
        }
        Ok(Self { points, bounds })
    }

    /// Builds a point set from a flat array of coordinates `[x, y, x, y, ...]`.
    /// The id of each point is its position in the array.
    pub fn from_coords(coords: &[f64]) -> Result<Self, PointSetError> {
        if coords.len() % 2 != 0 {
            return Err(PointSetError::OddCoordinateCount(coords.len()));
        }
        let points = coords
            .chunks_exact(2)
            .enumerate()
            .map(|(id, c)| Point::new(id, c[0], c[1]))
            .collect();
        Self::new(points)
    }

    /// Generates `count` uniformly distributed points within `bounds`.
    pub fn random(count: usize, bounds: BoundingBox<2>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sample = |axis: usize| {
            if bounds.extent(axis) > 0.0 {
                rng.gen_range(bounds.min[axis]..bounds.max[axis])
            } else {
                bounds.min[axis]
            }
        };
        let points = (0..count)
            .map(|id| {
                let x = sample(0);
                let y = sample(1);
                Point::new(id, x, y)
            })
            .collect();
        Self { points, bounds }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> &BoundingBox<2> {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn validate_ids(points: &[Point]) -> Result<(), PointSetError> {
    let len = points.len();
    let mut seen = vec![false; len];
    for p in points {
        if p.id >= len {
            return Err(PointSetError::IdOutOfRange { id: p.id, len });
        }
        if seen[p.id] {
            return Err(PointSetError::DuplicateId(p.id));
        }
        seen[p.id] = true;
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(PointSetError::NonFiniteCoordinate { id: p.id });
        }
    }
    Ok(())
}
