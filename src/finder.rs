use crate::algorithm::grid::{GridConfig, GridIndex};
use crate::algorithm::kdtree::BalancedTree;
use crate::algorithm::{Axis, NearestPointResolver};
use crate::point::PointSet;
use serde::{Deserialize, Serialize};

/// Which index backs a [`NodeFinder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Approximate, constant-time grid.
    Grid,
    /// Exact median-balanced 2D tree.
    #[default]
    Tree,
}

/// Settings for a [`NodeFinder`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub kind: IndexKind,
    pub grid: GridConfig,
    /// Axis the tree root splits on.
    pub start_axis: Axis,
    /// Default search radius as a fraction of the bounding box diagonal.
    pub default_distance_fraction: f64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            kind: IndexKind::default(),
            grid: GridConfig::default(),
            start_axis: Axis::X,
            default_distance_fraction: 0.01,
        }
    }
}

#[derive(Clone, Debug)]
enum Index {
    Grid(GridIndex),
    Tree(BalancedTree),
}

/// Finds the node under the pointer for one loaded dataset.
///
/// Built once per dataset, then queried as the pointer moves. The default search
/// radius is a fixed fraction of the dataset's bounding box diagonal.
#[derive(Clone, Debug)]
pub struct NodeFinder {
    index: Index,
    default_max_distance: f64,
}

impl NodeFinder {
    pub fn new(points: &PointSet, config: &FinderConfig) -> Self {
        let index = match config.kind {
            IndexKind::Grid => Index::Grid(GridIndex::with_config(points, config.grid)),
            IndexKind::Tree => Index::Tree(BalancedTree::with_axis(points, config.start_axis)),
        };
        let default_max_distance = config.default_distance_fraction * points.bounds().diagonal();
        log::debug!(
            "NodeFinder: {:?} index over {} points, default radius {}",
            config.kind,
            points.len(),
            default_max_distance
        );
        Self { index, default_max_distance }
    }

    pub fn kind(&self) -> IndexKind {
        match self.index {
            Index::Grid(_) => IndexKind::Grid,
            Index::Tree(_) => IndexKind::Tree,
        }
    }

    pub fn default_max_distance(&self) -> f64 {
        self.default_max_distance
    }

    /// Nearest node within the default search radius.
    pub fn query_default(&self, x: f64, y: f64) -> Option<usize> {
        self.query(x, y, self.default_max_distance)
    }

    fn resolver(&self) -> &dyn NearestPointResolver {
        match &self.index {
            Index::Grid(grid) => grid,
            Index::Tree(tree) => tree,
        }
    }
}

impl NearestPointResolver for NodeFinder {
    fn build(points: &PointSet) -> Self {
        Self::new(points, &FinderConfig::default())
    }

    fn query(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        self.resolver().query(x, y, max_distance)
    }

    fn len(&self) -> usize {
        self.resolver().len()
    }
}
