//! Dense all-pairs shortest-path back-end (Floyd-Warshall).
//!
//! Nodes are relabeled `0..n-1` in insertion order and two `n x n` matrices
//! are filled: `dist` (edge weight where an edge exists, infinity elsewhere,
//! 0 on the diagonal) and `pred` (the row index where an edge exists,
//! [`NO_PRED`] elsewhere). The kernel is the canonical triple loop with a
//! strict-improvement predecessor update.
//!
//! # Parallel kernel
//! The rows are cut into one contiguous band per worker and the matrices are
//! split into disjoint mutable bands, so every worker writes only its own
//! rows. Per intermediate vertex `w`:
//! 1. the worker owning row `w` publishes a copy of it (distances and
//!    predecessors) into a shared pivot buffer behind an `RwLock`;
//! 2. a barrier releases all workers to update their bands against the
//!    pivot copy;
//! 3. a second barrier holds everyone until the slowest band finishes, so
//!    all rows reflect iteration `w` before any worker begins `w+1`.
//!
//! The matrices and the pivot buffer are the only shared state.

use crate::apsp::matrix::SquareMatrix;
use crate::apsp::paths;
use crate::graph::PlantGraph;
use crate::utils::split_ranges;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Barrier, RwLock};
use std::thread;

/// Predecessor-matrix sentinel for "no path".
pub(crate) const NO_PRED: usize = usize::MAX;

/// Serial Floyd-Warshall. Writes `shortest_path` and `shpath_length` onto
/// every node.
pub fn predecessor_and_distance_serial(g: &mut PlantGraph) {
    let (marks, mut dist, mut pred) = initialization(g);
    kernel(&mut dist, &mut pred);
    let all_paths = paths::construct_all(&pred, &marks, false);
    store(g, &marks, &dist, all_paths);
}

/// Parallel Floyd-Warshall with `workers` row bands. Writes `shortest_path`
/// and `shpath_length` onto every node.
pub fn predecessor_and_distance_parallel(g: &mut PlantGraph, workers: usize) {
    let (marks, mut dist, mut pred) = initialization(g);
    kernel_parallel(&mut dist, &mut pred, workers);
    let all_paths = paths::construct_all(&pred, &marks, true);
    store(g, &marks, &dist, all_paths);
}

/// Relabel nodes and build the initial distance/predecessor matrices.
fn initialization(g: &PlantGraph) -> (Vec<String>, SquareMatrix<f64>, SquareMatrix<usize>) {
    let marks: Vec<String> = g.marks().map(str::to_string).collect();
    let index: HashMap<&str, usize> = marks
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();
    let n = marks.len();

    let mut dist = SquareMatrix::new(n, f64::INFINITY);
    let mut pred = SquareMatrix::new(n, NO_PRED);
    for i in 0..n {
        dist.set(i, i, 0.0);
    }
    for (u, v, e) in g.edges() {
        let (ui, vi) = (index[u], index[v]);
        dist.set(ui, vi, e.weight);
        pred.set(ui, vi, ui);
    }
    (marks, dist, pred)
}

/// Classical in-place triple loop. Where a distance strictly improves via
/// `w`, the predecessor is broadcast from row `w`.
fn kernel(dist: &mut SquareMatrix<f64>, pred: &mut SquareMatrix<usize>) {
    let n = dist.n();
    for w in 0..n {
        for i in 0..n {
            let d_iw = dist.get(i, w);
            if !d_iw.is_finite() {
                continue;
            }
            for j in 0..n {
                let cand = d_iw + dist.get(w, j);
                if cand < dist.get(i, j) {
                    dist.set(i, j, cand);
                    pred.set(i, j, pred.get(w, j));
                }
            }
        }
    }
}

/// Row-banded parallel kernel. See the module docs for the barrier scheme.
fn kernel_parallel(dist: &mut SquareMatrix<f64>, pred: &mut SquareMatrix<usize>, workers: usize) {
    let n = dist.n();
    if n == 0 {
        return;
    }
    let bands = split_ranges(n, workers);
    let barrier = Barrier::new(bands.len());
    // Pivot row `w` of the current iteration: (distances, predecessors).
    let pivot = RwLock::new((vec![0.0f64; n], vec![NO_PRED; n]));

    let dist_bands = dist.bands_mut(&bands);
    let pred_bands = pred.bands_mut(&bands);

    thread::scope(|scope| {
        for ((&(_, start, end), dband), pband) in
            bands.iter().zip(dist_bands).zip(pred_bands)
        {
            let barrier = &barrier;
            let pivot = &pivot;
            scope.spawn(move || {
                for w in 0..n {
                    if (start..end).contains(&w) {
                        let local = (w - start) * n;
                        let mut rows = pivot.write().unwrap();
                        rows.0.copy_from_slice(&dband[local..local + n]);
                        rows.1.copy_from_slice(&pband[local..local + n]);
                    }
                    barrier.wait();
                    {
                        let rows = pivot.read().unwrap();
                        for i in 0..(end - start) {
                            let base = i * n;
                            let d_iw = dband[base + w];
                            if !d_iw.is_finite() {
                                continue;
                            }
                            for j in 0..n {
                                let cand = d_iw + rows.0[j];
                                if cand < dband[base + j] {
                                    dband[base + j] = cand;
                                    pband[base + j] = rows.1[j];
                                }
                            }
                        }
                    }
                    barrier.wait();
                }
            });
        }
    });
}

/// Write reconstructed paths and matrix distances onto the nodes.
fn store(
    g: &mut PlantGraph,
    marks: &[String],
    dist: &SquareMatrix<f64>,
    all_paths: Vec<Vec<(usize, Vec<String>)>>,
) {
    for (i, source_paths) in all_paths.into_iter().enumerate() {
        let mut shortest_path = BTreeMap::new();
        let mut shpath_length = BTreeMap::new();
        for (t, path) in source_paths {
            let target = marks[t].clone();
            shpath_length.insert(target.clone(), dist.get(i, t));
            shortest_path.insert(target, path);
        }
        let node = g.node_mut(&marks[i]).expect("live node during store");
        node.shortest_path = shortest_path;
        node.shpath_length = shpath_length;
    }
}
