//! JavaScript bindings.

use crate::algorithm::NearestPointResolver;
use crate::finder::{FinderConfig, IndexKind, NodeFinder};
use crate::point::PointSet;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

/// Node lookup for a 2D dataset, exposed to JavaScript.
#[wasm_bindgen]
pub struct NodeFinder2D {
    inner: NodeFinder,
}

#[wasm_bindgen]
impl NodeFinder2D {
    /// Builds the finder over a flat array `[x, y, x, y, ...]`; node ids are positions.
    ///
    /// # Arguments
    /// * `coords` - Node coordinates in data space.
    /// * `use_grid` - Use the approximate grid instead of the exact tree.
    #[wasm_bindgen(constructor)]
    pub fn new(coords: &[f64], use_grid: bool) -> Result<NodeFinder2D, JsError> {
        let points = PointSet::from_coords(coords).map_err(|e| JsError::new(&e.to_string()))?;
        let config = FinderConfig {
            kind: if use_grid { IndexKind::Grid } else { IndexKind::Tree },
            ..Default::default()
        };
        Ok(NodeFinder2D { inner: NodeFinder::new(&points, &config) })
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter, js_name = defaultMaxDistance)]
    pub fn default_max_distance(&self) -> f64 {
        self.inner.default_max_distance()
    }

    pub fn query(&self, x: f64, y: f64, max_distance: f64) -> Option<u32> {
        self.inner.query(x, y, max_distance).map(|id| id as u32)
    }

    #[wasm_bindgen(js_name = queryDefault)]
    pub fn query_default(&self, x: f64, y: f64) -> Option<u32> {
        self.inner.query_default(x, y).map(|id| id as u32)
    }

    /// Queries every `[x, y]` pair of `coords`; misses are reported as -1.
    #[wasm_bindgen(js_name = queryBatch)]
    pub fn query_batch(&self, coords: &[f64], max_distance: f64) -> Vec<i32> {
        let queries: Vec<[f64; 2]> = coords.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
        self.inner
            .query_batch(&queries, max_distance)
            .into_iter()
            .map(|id| id.map_or(-1, |id| id as i32))
            .collect()
    }
}
