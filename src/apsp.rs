//! All-pairs shortest-path engine.
//!
//! Two interchangeable back-ends compute, for every node, the shortest path
//! and weighted path length to every reachable target:
//! - [`floyd_warshall`] -- dense back-end over shared distance/predecessor
//!   matrices, serial and parallel (row-banded workers behind a barrier).
//! - [`dijkstra`] -- sparse back-end running one single-source Dijkstra per
//!   node, serial and parallel (chunked workers streaming results through a
//!   bounded channel).
//!
//! [`compute_shortest_paths`] picks among them by graph size and density:
//!
//! | node count | density | back-end |
//! |---|---|---|
//! | > 10 000 | <= 1e-6 | parallel Dijkstra |
//! | > 10 000 | > 1e-6 | parallel Floyd-Warshall |
//! | <= 10 000 | <= 1e-6 | serial Dijkstra |
//! | <= 10 000 | > 1e-6 | serial Floyd-Warshall |
//!
//! Worker count equals the number of hardware threads. Whatever the
//! back-end, the run finishes by deriving each node's per-target efficiency
//! list (`1/length`, 0 for the trivial self path) from the freshly written
//! lengths.

pub mod dijkstra;
pub mod floyd_warshall;
pub mod matrix;
pub mod paths;

use crate::graph::PlantGraph;
use tracing::info;

/// Node count above which the parallel variants are used.
pub const PARALLEL_NODE_THRESHOLD: usize = 10_000;

/// Density at or below which the graph counts as sparse.
pub const SPARSE_DENSITY_THRESHOLD: f64 = 1e-6;

/// Back-end selection for [`compute_shortest_paths_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Pick by the size/density table.
    Auto,
    FloydWarshall,
    Dijkstra,
}

/// Compute all-pairs shortest paths with the automatically selected
/// back-end and one worker per hardware thread, then refresh every node's
/// `shortest_path`, `shpath_length` and `efficiency` attributes.
pub fn compute_shortest_paths(g: &mut PlantGraph) {
    compute_shortest_paths_with(g, Backend::Auto, num_cpus::get());
}

/// [`compute_shortest_paths`] with an explicit back-end and worker count.
/// `Backend::Auto` applies the selection table; a forced back-end still
/// honors the node-count threshold when choosing serial vs parallel.
pub fn compute_shortest_paths_with(g: &mut PlantGraph, backend: Backend, workers: usize) {
    let n = g.len();
    if n == 0 {
        return;
    }
    let density = g.density();
    let go_parallel = n > PARALLEL_NODE_THRESHOLD;

    let backend = match backend {
        Backend::Auto if density <= SPARSE_DENSITY_THRESHOLD => Backend::Dijkstra,
        Backend::Auto => Backend::FloydWarshall,
        forced => forced,
    };

    info!(
        nodes = n,
        density,
        parallel = go_parallel,
        backend = ?backend,
        "computing all-pairs shortest paths"
    );

    match (backend, go_parallel) {
        (Backend::Dijkstra, true) => dijkstra::single_source_parallel(g, workers),
        (Backend::Dijkstra, false) => dijkstra::single_source_serial(g),
        (Backend::FloydWarshall, true) => {
            floyd_warshall::predecessor_and_distance_parallel(g, workers)
        }
        (Backend::FloydWarshall, false) => floyd_warshall::predecessor_and_distance_serial(g),
        (Backend::Auto, _) => unreachable!("Auto resolved above"),
    }

    derive_efficiencies(g);
}

/// Rewrite every node's efficiency list from its freshly computed path
/// lengths: one `(target, 1/length)` entry per reachable target, 0 when the
/// length is 0.
fn derive_efficiencies(g: &mut PlantGraph) {
    for node in g.records_mut() {
        node.efficiency = node
            .shpath_length
            .iter()
            .map(|(target, &len)| {
                let eff = if len != 0.0 { 1.0 / len } else { 0.0 };
                (target.clone(), eff)
            })
            .collect();
    }
}
