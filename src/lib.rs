//! # nodefinder
//!
//! `nodefinder` resolves an interactively chosen coordinate to the nearest node of a
//! 2D dataset, such as the customers and depots of a routing problem. It backs
//! "hover to inspect" in a viewer: the index is built once per loaded dataset and then
//! queried every time the pointer moves.
//!
//! ## Features
//!
//! - **Two interchangeable indexes** behind [`NearestPointResolver`]:
//!   - [`GridIndex`]: a fixed `D x D` lookup table, O(1) and approximate.
//!   - [`BalancedTree`]: an exact, median-balanced 2D tree with branch-and-bound search.
//! - **Bounded search**: a query never returns a node farther than `max_distance`.
//! - **Parallel batches**: indexes are immutable, so `query_batch` fans out with rayon.
//! - **WASM-ready**: [`NodeFinder2D`] wraps everything for JavaScript.
//!
//! ## Example
//!
//! ```
//! use nodefinder::{BalancedTree, NearestPointResolver, PointSet};
//!
//! let points = PointSet::from_coords(&[0.0, 0.0, 10.0, 0.0, 5.0, 5.0]).unwrap();
//! let tree = BalancedTree::build(&points);
//! assert_eq!(tree.query(4.0, 4.0, 10.0), Some(2));
//! assert_eq!(tree.query(4.0, 4.0, 1.0), None);
//! ```
//!
//! ## Main Interface
//!
//! Most callers want [`NodeFinder`], which picks the index from a [`FinderConfig`] and
//! derives a default search radius from the dataset's bounding box.

mod algorithm;
mod bounds;
mod finder;
mod point;
mod wasm;

pub use algorithm::grid::AxisMapping;
pub use algorithm::grid::GridConfig;
pub use algorithm::grid::GridIndex;
pub use algorithm::kdtree::BalancedTree;
pub use algorithm::distance;
pub use algorithm::search_bound;
pub use algorithm::Axis;
pub use algorithm::NearestPointResolver;
pub use bounds::BoundingBox;
pub use finder::FinderConfig;
pub use finder::IndexKind;
pub use finder::NodeFinder;
pub use point::Point;
pub use point::PointSet;
pub use point::PointSetError;
pub use wasm::NodeFinder2D;
