use crate::point::PointSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub mod grid;
pub mod kdtree;

#[cfg(test)]
pub(crate) mod insertion_tree;

/// Trait defining a nearest-point lookup structure.
/// This allows swapping between the approximate Grid and the exact balanced 2D tree.
///
/// Implementations are immutable once built, so any number of threads may query
/// the same index at once.
pub trait NearestPointResolver: Send + Sync {
    /// Build the index over every point of the set, using default settings.
    fn build(points: &PointSet) -> Self
    where
        Self: Sized;

    /// Id of the point nearest to `(x, y)`, if one lies within `max_distance`.
    ///
    /// A point matches when its distance is strictly below `max_distance`, except
    /// that a bound of exactly zero matches exact coincidences. Negative or NaN bounds
    /// and non-finite coordinates never match. Approximate indexes may skip the
    /// distance check and say so.
    fn query(&self, x: f64, y: f64, max_distance: f64) -> Option<usize>;

    /// Number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `query` for every position in parallel.
    fn query_batch(&self, queries: &[[f64; 2]], max_distance: f64) -> Vec<Option<usize>> {
        queries
            .par_iter()
            .map(|q| self.query(q[0], q[1], max_distance))
            .collect()
    }
}

/// Coordinate axis a tree node splits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    #[inline]
    pub fn of(self, p: &[f64; 2]) -> f64 {
        p[self.index()]
    }
}

/// Euclidean distance between two positions.
#[inline]
pub fn distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Turns a caller's `max_distance` into an exclusive search bound.
///
/// Returns `None` when nothing can match. A zero bound becomes the smallest
/// positive `f64`, so that only distance 0 passes `d < bound`.
pub fn search_bound(max_distance: f64) -> Option<f64> {
    if max_distance.is_nan() || max_distance < 0.0 {
        None
    } else if max_distance == 0.0 {
        Some(f64::from_bits(1))
    } else {
        Some(max_distance)
    }
}

/// Linear scan reference used by tests to check the indexes.
#[cfg(test)]
pub(crate) fn brute_force(points: &PointSet, x: f64, y: f64, max_distance: f64) -> Option<(usize, f64)> {
    let bound = search_bound(max_distance)?;
    let q = [x, y];
    points
        .iter()
        .map(|p| (p.id, distance(&p.position(), &q)))
        .filter(|&(_, d)| d < bound)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_bound_edge_cases() {
        assert_eq!(search_bound(f64::NAN), None);
        assert_eq!(search_bound(-1.0), None);
        assert_eq!(search_bound(2.5), Some(2.5));
        assert_eq!(search_bound(f64::INFINITY), Some(f64::INFINITY));

        let zero = search_bound(0.0).unwrap();
        assert!(0.0 < zero);
        assert!(!(f64::MIN_POSITIVE < zero));
    }

    #[test]
    fn test_axis_alternates() {
        assert_eq!(Axis::X.other(), Axis::Y);
        assert_eq!(Axis::Y.other().other(), Axis::Y);
        assert_eq!(Axis::Y.of(&[3.0, 4.0]), 4.0);
    }

    #[test]
    fn test_distance_uses_hypot() {
        assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert!(distance(&[1e300, 0.0], &[-1e300, 0.0]).is_finite());
    }
}
