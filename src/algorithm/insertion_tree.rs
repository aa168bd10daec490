//! Insertion-ordered 2D tree, kept only as a test oracle for the balanced tree.
//!
//! Points descend by comparison and are attached where they fall, without any
//! rebalancing, so sorted input makes it a linked list.

use crate::algorithm::{distance, search_bound, Axis};
use crate::point::PointSet;

const NONE: u32 = u32::MAX;

struct Node {
    id: usize,
    pos: [f64; 2],
    axis: Axis,
    less: u32,
    more: u32,
}

pub(crate) struct InsertionTree {
    nodes: Vec<Node>,
}

impl InsertionTree {
    pub(crate) fn build(points: &PointSet) -> Self {
        let mut tree = InsertionTree { nodes: Vec::with_capacity(points.len()) };
        for p in points {
            tree.insert(p.id, p.position());
        }
        tree
    }

    fn insert(&mut self, id: usize, pos: [f64; 2]) {
        let new_idx = self.nodes.len() as u32;
        if self.nodes.is_empty() {
            self.nodes.push(Node { id, pos, axis: Axis::X, less: NONE, more: NONE });
            return;
        }

        let mut current = 0usize;
        loop {
            let node = &self.nodes[current];
            let less = node.axis.of(&pos) < node.axis.of(&node.pos);
            let child = if less { node.less } else { node.more };
            if child != NONE {
                current = child as usize;
                continue;
            }

            let axis = node.axis.other();
            let node = &mut self.nodes[current];
            if less { node.less = new_idx; } else { node.more = new_idx; }
            self.nodes.push(Node { id, pos, axis, less: NONE, more: NONE });
            return;
        }
    }

    pub(crate) fn nearest(&self, x: f64, y: f64, max_distance: f64) -> (Option<usize>, f64) {
        match search_bound(max_distance) {
            Some(bound) if !self.nodes.is_empty() => {
                let mut best = (None, bound);
                self.nearest_recursive(0, &[x, y], &mut best);
                best
            }
            _ => (None, max_distance),
        }
    }

    fn nearest_recursive(&self, node_idx: u32, q: &[f64; 2], best: &mut (Option<usize>, f64)) {
        if node_idx == NONE {
            return;
        }
        let node = &self.nodes[node_idx as usize];
        let diff = node.axis.of(q) - node.axis.of(&node.pos);
        let (near, far) = if diff < 0.0 { (node.less, node.more) } else { (node.more, node.less) };

        self.nearest_recursive(near, q, best);
        if diff.abs() >= best.1 {
            return;
        }
        let d = distance(q, &node.pos);
        if d < best.1 {
            *best = (Some(node.id), d);
        }
        self.nearest_recursive(far, q, best);
    }

    pub(crate) fn height(&self) -> usize {
        self.height_recursive(if self.nodes.is_empty() { NONE } else { 0 })
    }

    fn height_recursive(&self, node_idx: u32) -> usize {
        if node_idx == NONE {
            return 0;
        }
        let node = &self.nodes[node_idx as usize];
        1 + self.height_recursive(node.less).max(self.height_recursive(node.more))
    }
}
