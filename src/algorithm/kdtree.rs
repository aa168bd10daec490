use crate::algorithm::{distance, search_bound, Axis, NearestPointResolver};
use crate::point::PointSet;

/// Marks a missing child.
const NONE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct KdNode {
    id: usize,
    pos: [f64; 2],
    axis: Axis,
    left: u32,
    right: u32,
}

/// An exact 2D tree balanced on the median at every level.
///
/// Nodes live in one flat array and refer to their children by index. Every node's
/// two subtrees differ in size by at most one, so the height is `ceil(log2(n + 1))`
/// whatever the input order.
///
/// When several points are equally near, the search keeps the first one it meets,
/// visiting the near subtree, then the node, then the far subtree.
#[derive(Clone, Debug)]
pub struct BalancedTree {
    nodes: Vec<KdNode>,
    root: u32,
}

impl BalancedTree {
    /// Builds the tree with the root splitting on `start_axis`.
    pub fn with_axis(points: &PointSet, start_axis: Axis) -> Self {
        let mut entries: Vec<(usize, [f64; 2])> = points.iter().map(|p| (p.id, p.position())).collect();
        let mut tree = BalancedTree {
            nodes: Vec::with_capacity(entries.len()),
            root: NONE,
        };
        tree.root = tree.build_recursive(&mut entries, start_axis);

        log::debug!(
            "BalancedTree: built over {} points, height {}",
            tree.nodes.len(),
            tree.height()
        );
        tree
    }

    fn build_recursive(&mut self, entries: &mut [(usize, [f64; 2])], axis: Axis) -> u32 {
        if entries.is_empty() {
            return NONE;
        }

        // Stable, so equal coordinates keep their input order.
        entries.sort_by(|a, b| axis.of(&a.1).total_cmp(&axis.of(&b.1)));
        let mid = entries.len() / 2;
        let (id, pos) = entries[mid];

        let (lower, rest) = entries.split_at_mut(mid);
        let left = self.build_recursive(lower, axis.other());
        let right = self.build_recursive(&mut rest[1..], axis.other());

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(KdNode { id, pos, axis, left, right });
        node_idx
    }

    /// Nearest point to `(x, y)` closer than `max_distance`, and its distance.
    ///
    /// Without a match the distance is `max_distance` itself.
    pub fn nearest(&self, x: f64, y: f64, max_distance: f64) -> (Option<usize>, f64) {
        let Some(bound) = search_bound(max_distance) else {
            return (None, max_distance);
        };
        if !x.is_finite() || !y.is_finite() {
            return (None, max_distance);
        }

        let mut best = Nearest { id: None, dist: bound };
        self.nearest_recursive(self.root, &[x, y], &mut best);
        match best.id {
            Some(_) => (best.id, best.dist),
            None => (None, max_distance),
        }
    }

    fn nearest_recursive(&self, node_idx: u32, q: &[f64; 2], best: &mut Nearest) {
        if node_idx == NONE {
            return;
        }
        let node = &self.nodes[node_idx as usize];

        let diff = node.axis.of(q) - node.axis.of(&node.pos);
        let (near, far) = if diff < 0.0 { (node.left, node.right) } else { (node.right, node.left) };

        self.nearest_recursive(near, q, best);

        // Nothing beyond the splitting line can beat the current best.
        if diff.abs() >= best.dist {
            return;
        }

        let d = distance(q, &node.pos);
        if d < best.dist {
            best.id = Some(node.id);
            best.dist = d;
        }

        self.nearest_recursive(far, q, best);
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.height_recursive(self.root)
    }

    fn height_recursive(&self, node_idx: u32) -> usize {
        if node_idx == NONE {
            return 0;
        }
        let node = &self.nodes[node_idx as usize];
        1 + self.height_recursive(node.left).max(self.height_recursive(node.right))
    }

    #[cfg(test)]
    fn check_invariants(&self, node_idx: u32) -> usize {
        if node_idx == NONE {
            return 0;
        }
        let node = &self.nodes[node_idx as usize];
        let split = node.axis.of(&node.pos);
        let mut below = Vec::new();
        self.collect(node.left, &mut below);
        let mut above = Vec::new();
        self.collect(node.right, &mut above);
        assert!(below.iter().all(|p| node.axis.of(p) <= split), "left subtree crosses split");
        assert!(above.iter().all(|p| node.axis.of(p) >= split), "right subtree crosses split");
        for child in [node.left, node.right] {
            if child != NONE {
                assert_eq!(self.nodes[child as usize].axis, node.axis.other(), "axis must alternate");
            }
        }

        let l = self.check_invariants(node.left);
        let r = self.check_invariants(node.right);
        assert!(l.abs_diff(r) <= 1, "unbalanced node: {} vs {}", l, r);
        l + r + 1
    }

    #[cfg(test)]
    fn collect(&self, node_idx: u32, out: &mut Vec<[f64; 2]>) {
        if node_idx == NONE {
            return;
        }
        let node = &self.nodes[node_idx as usize];
        out.push(node.pos);
        self.collect(node.left, out);
        self.collect(node.right, out);
    }
}

struct Nearest {
    id: Option<usize>,
    dist: f64,
}

impl NearestPointResolver for BalancedTree {
    fn build(points: &PointSet) -> Self {
        Self::with_axis(points, Axis::X)
    }

    fn query(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        self.nearest(x, y, max_distance).0
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::brute_force;
    use crate::algorithm::insertion_tree::InsertionTree;
    use crate::bounds::BoundingBox;
    use crate::point::Point;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn triangle() -> PointSet {
        PointSet::from_coords(&[0.0, 0.0, 10.0, 0.0, 5.0, 5.0]).unwrap()
    }

    #[test]
    fn test_nearest_reports_distance() {
        let tree = BalancedTree::build(&triangle());
        let (id, d) = tree.nearest(4.0, 4.0, 10.0);
        assert_eq!(id, Some(2));
        assert!((d - 2.0f64.sqrt()).abs() < 1e-12);

        let (id, d) = tree.nearest(4.0, 4.0, 1.0);
        assert_eq!(id, None);
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_empty_tree() {
        let tree = BalancedTree::build(&PointSet::new(Vec::new()).unwrap());
        assert_eq!(tree.height(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(1.0, 2.0, 3.0), (None, 3.0));
        assert_eq!(tree.query(0.0, 0.0, f64::INFINITY), None);
    }

    #[test]
    fn test_invariants_hold_for_random_sets() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
        for n in [1, 2, 3, 7, 8, 100, 257] {
            let points = PointSet::random(n, bounds, rng.gen_range(0..u64::MAX));
            for axis in [Axis::X, Axis::Y] {
                let tree = BalancedTree::with_axis(&points, axis);
                assert_eq!(tree.nodes[tree.root as usize].axis, axis);
                assert_eq!(tree.check_invariants(tree.root), n);
            }
        }
    }

    #[test]
    fn test_invariants_hold_with_ties() {
        // Every point shares its x with many others.
        let points: Vec<Point> = (0..60)
            .map(|i| Point::new(i, (i % 3) as f64, (i / 3) as f64))
            .collect();
        let set = PointSet::new(points).unwrap();
        let tree = BalancedTree::build(&set);
        assert_eq!(tree.check_invariants(tree.root), 60);
        for p in &set {
            assert_eq!(tree.query(p.x, p.y, 0.5), Some(p.id));
        }
    }

    #[test]
    fn test_height_is_logarithmic() {
        let bounds = BoundingBox::new([0.0, 0.0], [1.0, 1.0]);
        for n in 0..300usize {
            let tree = BalancedTree::build(&PointSet::random(n, bounds, n as u64));
            let expected = (usize::BITS - n.leading_zeros()) as usize;
            assert_eq!(tree.height(), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_sorted_input_stays_balanced() {
        // Inserting a sorted diagonal degenerates the insertion-ordered tree.
        let coords: Vec<f64> = (0..128).flat_map(|i| [i as f64, i as f64]).collect();
        let set = PointSet::from_coords(&coords).unwrap();

        let balanced = BalancedTree::build(&set);
        let inserted = InsertionTree::build(&set);
        assert_eq!(balanced.height(), 8);
        assert_eq!(inserted.height(), 128);

        for p in &set {
            assert_eq!(balanced.query(p.x + 0.1, p.y, 0.5), inserted.nearest(p.x + 0.1, p.y, 0.5).0);
        }
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = BoundingBox::new([-50.0, -50.0], [50.0, 50.0]);
        for round in 0..50 {
            let n = rng.gen_range(1..200);
            let points = PointSet::random(n, bounds, round);
            let tree = BalancedTree::build(&points);
            for _ in 0..50 {
                let x = rng.gen_range(-60.0..60.0);
                let y = rng.gen_range(-60.0..60.0);
                let bound = rng.gen_range(0.0..30.0);
                let expected = brute_force(&points, x, y, bound);
                let (id, d) = tree.nearest(x, y, bound);
                match expected {
                    Some((_, best)) => {
                        let id = id.expect("tree missed a point in range");
                        assert_eq!(d, best);
                        let p = points.points()[id];
                        assert_eq!(distance(&p.position(), &[x, y]), best);
                    }
                    None => assert_eq!(id, None),
                }
            }
        }
    }

    #[test]
    fn test_equidistant_points_resolve_deterministically() {
        let set = PointSet::from_coords(&[-1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, -1.0]).unwrap();
        let tree = BalancedTree::build(&set);
        let first = tree.query(0.0, 0.0, 2.0);
        assert!(first.is_some());
        for _ in 0..10 {
            assert_eq!(tree.query(0.0, 0.0, 2.0), first);
        }
    }
}
