//! Sparse all-pairs shortest-path back-end (multi-source Dijkstra).
//!
//! One single-source Dijkstra per node over non-negative edge weights,
//! yielding that node's length and path maps (including the trivial self
//! path at length 0).
//!
//! The parallel variant cuts the node set into one contiguous chunk per
//! worker. Each worker streams `(source, result)` tuples through a bounded
//! multi-producer single-consumer channel; the collector drains the channel
//! until every worker has disconnected, then writes the results back. A
//! worker panic tears down the thread scope and aborts the computation, so
//! partial results are never consumed.

use crate::graph::PlantGraph;
use crate::utils::{OrdF64, split_ranges};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::sync::mpsc;
use std::thread;

/// Length and path maps produced by one single-source run.
pub(crate) struct SsspMaps {
    pub lengths: BTreeMap<String, f64>,
    pub paths: BTreeMap<String, Vec<String>>,
}

/// Binary-heap Dijkstra from `source`. Only reachable targets appear in the
/// returned maps.
pub(crate) fn single_source(g: &PlantGraph, source: &str) -> SsspMaps {
    let mut dist: HashMap<&str, f64> = HashMap::new();
    let mut prev: HashMap<&str, &str> = HashMap::new();
    let mut frontier: BinaryHeap<Reverse<(OrdF64, &str)>> = BinaryHeap::new();

    dist.insert(source, 0.0);
    frontier.push(Reverse((OrdF64(0.0), source)));

    while let Some(Reverse((OrdF64(d), u))) = frontier.pop() {
        if d > dist[u] {
            continue; // stale frontier entry
        }
        for (v, edge) in g.out_edges(u) {
            let cand = d + edge.weight;
            if dist.get(v.as_str()).is_none_or(|&known| cand < known) {
                dist.insert(v.as_str(), cand);
                prev.insert(v.as_str(), u);
                frontier.push(Reverse((OrdF64(cand), v.as_str())));
            }
        }
    }

    let mut lengths = BTreeMap::new();
    let mut paths = BTreeMap::new();
    for (&target, &len) in &dist {
        let mut rev = vec![target];
        let mut curr = target;
        while let Some(&p) = prev.get(curr) {
            rev.push(p);
            curr = p;
        }
        rev.reverse();
        lengths.insert(target.to_string(), len);
        paths.insert(
            target.to_string(),
            rev.into_iter().map(str::to_string).collect(),
        );
    }
    SsspMaps { lengths, paths }
}

/// Serial sweep: one Dijkstra per node, results written straight back.
pub fn single_source_serial(g: &mut PlantGraph) {
    let marks: Vec<String> = g.marks().map(str::to_string).collect();
    for mark in marks {
        let maps = single_source(g, &mark);
        let node = g.node_mut(&mark).expect("live node during store");
        node.shortest_path = maps.paths;
        node.shpath_length = maps.lengths;
    }
}

/// Parallel sweep with `workers` chunks of sources. Results stream through a
/// bounded channel and are written back once every worker is done.
pub fn single_source_parallel(g: &mut PlantGraph, workers: usize) {
    let marks: Vec<String> = g.marks().map(str::to_string).collect();
    if marks.is_empty() {
        return;
    }
    let chunks = split_ranges(marks.len(), workers);
    let (tx, rx) = mpsc::sync_channel::<(String, SsspMaps)>(2 * chunks.len());

    let results: Vec<(String, SsspMaps)> = thread::scope(|scope| {
        let graph = &*g;
        let marks = &marks;
        for &(_, start, end) in &chunks {
            let tx = tx.clone();
            scope.spawn(move || {
                for source in &marks[start..end] {
                    let maps = single_source(graph, source);
                    tx.send((source.clone(), maps))
                        .expect("collector dropped before workers finished");
                }
            });
        }
        drop(tx);
        // Drain until every producer disconnects.
        rx.iter().collect()
    });

    for (source, maps) in results {
        let node = g.node_mut(&source).expect("live node during store");
        node.shortest_path = maps.paths;
        node.shpath_length = maps.lengths;
    }
}
