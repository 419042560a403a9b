//! Efficiency and centrality indicators derived from APSP output.
//!
//! Every function here assumes the APSP engine has just refreshed
//! `shortest_path`, `shpath_length` and `efficiency` on the graph it is
//! given. The `original_*` writers annotate the live graph before a
//! perturbation; the `final_*` writers annotate the snapshot from the
//! reduced live graph afterwards, leaving deleted nodes blank (`None`).
//!
//! The per-node centrality sweeps are independent per node, so they fan out
//! across the rayon pool.

use crate::element::NodeRecord;
use crate::graph::PlantGraph;
use rayon::prelude::*;

/// Nodal efficiency of every live node: the sum of its per-target
/// efficiencies over `N - 1`. Written as `original_nodal_eff`.
pub fn nodal_efficiency(g: &mut PlantGraph) {
    let n = g.len();
    let values: Vec<(String, f64)> = g
        .records()
        .map(|rec| (rec.mark.clone(), nodal_eff_of(rec.efficiency.as_slice(), n)))
        .collect();
    for (mark, value) in values {
        g.node_mut(&mark).unwrap().original_nodal_eff = Some(value);
    }
}

/// Post-perturbation nodal efficiency, written onto the snapshot as
/// `final_nodal_eff`. Nodes no longer alive stay blank.
pub fn final_nodal_efficiency(live: &PlantGraph, snapshot: &mut PlantGraph) {
    let n = live.len();
    let values: Vec<(String, f64)> = live
        .records()
        .map(|rec| (rec.mark.clone(), nodal_eff_of(rec.efficiency.as_slice(), n)))
        .collect();
    let snap_marks: Vec<String> = snapshot.marks().map(str::to_string).collect();
    for mark in snap_marks {
        snapshot.node_mut(&mark).unwrap().final_nodal_eff = None;
    }
    for (mark, value) in values {
        if let Some(node) = snapshot.node_mut(&mark) {
            node.final_nodal_eff = Some(value);
        }
    }
}

fn nodal_eff_of(efficiency: &[(String, f64)], n: usize) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let sum: f64 = efficiency.iter().map(|(_, e)| e).sum();
    sum / (n - 1) as f64
}

/// Local efficiency of every live node: the mean `original_nodal_eff` of its
/// immediate successors, 0 without successors. Written as
/// `original_local_eff`.
pub fn local_efficiency(g: &mut PlantGraph) {
    let values: Vec<(String, f64)> = g
        .marks()
        .map(|mark| {
            let succs: Vec<&str> = g.successors(mark).collect();
            let eff = if succs.is_empty() {
                0.0
            } else {
                let sum: f64 = succs
                    .iter()
                    .map(|s| g.node(s).unwrap().original_nodal_eff.unwrap_or_default())
                    .sum();
                sum / succs.len() as f64
            };
            (mark.to_string(), eff)
        })
        .collect();
    for (mark, value) in values {
        g.node_mut(&mark).unwrap().original_local_eff = Some(value);
    }
}

/// Post-perturbation local efficiency: mean `final_nodal_eff` of the
/// surviving successors, written onto the snapshot as `final_local_eff`.
/// Deleted nodes stay blank.
pub fn final_local_efficiency(live: &PlantGraph, snapshot: &mut PlantGraph) {
    let values: Vec<(String, f64)> = live
        .marks()
        .map(|mark| {
            let succs: Vec<&str> = live.successors(mark).collect();
            let eff = if succs.is_empty() {
                0.0
            } else {
                let sum: f64 = succs
                    .iter()
                    .map(|s| snapshot.node(s).unwrap().final_nodal_eff.unwrap_or_default())
                    .sum();
                sum / succs.len() as f64
            };
            (mark.to_string(), eff)
        })
        .collect();
    let snap_marks: Vec<String> = snapshot.marks().map(str::to_string).collect();
    for mark in snap_marks {
        snapshot.node_mut(&mark).unwrap().final_local_eff = None;
    }
    for (mark, value) in values {
        if let Some(node) = snapshot.node_mut(&mark) {
            node.final_local_eff = Some(value);
        }
    }
}

/// Average global efficiency of the live graph, broadcast to every live
/// node as `original_avg_global_eff`.
pub fn average_global_efficiency(g: &mut PlantGraph) {
    let value = avg_global_of(g);
    for node in g.records_mut() {
        node.original_avg_global_eff = Some(value);
    }
}

/// Post-perturbation average global efficiency: the surviving nodes' nodal
/// efficiencies averaged over the surviving count, broadcast to every
/// snapshot node (deleted ones included) as `final_avg_global_eff`.
pub fn final_average_global_efficiency(live: &PlantGraph, snapshot: &mut PlantGraph) {
    let value = avg_global_of(live);
    for node in snapshot.records_mut() {
        node.final_avg_global_eff = Some(value);
    }
}

fn avg_global_of(g: &PlantGraph) -> f64 {
    let n = g.len();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = g
        .records()
        .map(|rec| rec.original_nodal_eff.unwrap_or_default())
        .sum();
    sum / n as f64
}

/// Betweenness centrality: the share of reconstructed multi-node shortest
/// paths that pass through the node strictly between the endpoints.
pub fn betweenness_centrality(g: &mut PlantGraph) {
    let all_paths = multi_node_paths(g);
    let total = all_paths.len();
    let marks: Vec<String> = g.marks().map(str::to_string).collect();

    let values: Vec<f64> = marks
        .par_iter()
        .map(|mark| {
            if total == 0 {
                return 0.0;
            }
            let through = all_paths
                .iter()
                .filter(|path| path[1..path.len() - 1].iter().any(|m| m == mark))
                .count();
            through as f64 / total as f64
        })
        .collect();

    for (mark, value) in marks.iter().zip(values) {
        g.node_mut(mark).unwrap().betweenness_centrality = Some(value);
    }
}

/// Closeness centrality from the reconstructed incoming shortest paths: with
/// `k` multi-node paths ending at the node and `L` their summed lengths,
/// `(k / L) * (k / (N - 1))`, 0 when `L` is 0.
pub fn closeness_centrality(g: &mut PlantGraph) {
    let n = g.len();
    let all_paths = multi_node_paths(g);
    let marks: Vec<String> = g.marks().map(str::to_string).collect();

    let shared = &*g;
    let values: Vec<f64> = marks
        .par_iter()
        .map(|mark| {
            let mut k = 0usize;
            let mut total_len = 0.0f64;
            for path in &all_paths {
                if path.last().map(String::as_str) == Some(mark.as_str()) {
                    k += 1;
                    total_len += shared.node(&path[0]).unwrap().shpath_length[mark.as_str()];
                }
            }
            if total_len == 0.0 || n < 2 {
                0.0
            } else {
                let norm = k as f64 / (n - 1) as f64;
                (k as f64 / total_len) * norm
            }
        })
        .collect();

    for (mark, value) in marks.iter().zip(values) {
        g.node_mut(mark).unwrap().closeness_centrality = Some(value);
    }
}

/// Weighted total-degree centrality: incident edge weight over `N - 1`.
pub fn degree_centrality(g: &mut PlantGraph) {
    write_degree(g, |g, mark| g.degree_weighted(mark), |node, v| {
        node.degree_centrality = Some(v);
    });
}

/// Weighted in-degree centrality: incoming edge weight over `N - 1`.
pub fn indegree_centrality(g: &mut PlantGraph) {
    write_degree(g, |g, mark| g.in_degree_weighted(mark), |node, v| {
        node.indegree_centrality = Some(v);
    });
}

/// Weighted out-degree centrality: outgoing edge weight over `N - 1`.
pub fn outdegree_centrality(g: &mut PlantGraph) {
    write_degree(g, |g, mark| g.out_degree_weighted(mark), |node, v| {
        node.outdegree_centrality = Some(v);
    });
}

fn write_degree(
    g: &mut PlantGraph,
    degree: impl Fn(&PlantGraph, &str) -> f64 + Sync,
    write: impl Fn(&mut NodeRecord, f64),
) {
    let n = g.len();
    let marks: Vec<String> = g.marks().map(str::to_string).collect();
    let shared = &*g;
    let values: Vec<f64> = marks
        .par_iter()
        .map(|mark| {
            let deg = degree(shared, mark.as_str());
            if deg > 0.0 && n > 1 {
                deg / (n - 1) as f64
            } else {
                0.0
            }
        })
        .collect();
    for (mark, value) in marks.iter().zip(values) {
        write(g.node_mut(mark).unwrap(), value);
    }
}

/// Every reconstructed shortest path with more than one node, across all
/// live sources.
fn multi_node_paths(g: &PlantGraph) -> Vec<Vec<String>> {
    g.records()
        .flat_map(|rec| rec.shortest_path.values())
        .filter(|path| path.len() > 1)
        .cloned()
        .collect()
}
