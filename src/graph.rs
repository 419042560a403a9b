//! In-memory store for the plant dependency network.
//!
//! [`PlantGraph`] is a directed graph with string-keyed nodes. Each node
//! holds a typed [`NodeRecord`]; each edge carries the predecessor logic
//! relation and the service flow as a [`DependencyEdge`]. The store keeps
//! dual adjacency (successor and predecessor lists) so the cascade engine can
//! walk either direction cheaply, and preserves node insertion order so that
//! iteration, matrix labeling and report rows are deterministic.
//!
//! # Overview
//! - Mutation is limited to what perturbations need: add node/edge, remove a
//!   node (incident edges go with it), and attribute writes through
//!   [`node_mut`](PlantGraph::node_mut).
//! - Reachability ([`has_path`](PlantGraph::has_path)) and simple-path
//!   enumeration ([`all_simple_paths`](PlantGraph::all_simple_paths)) are
//!   plain BFS/DFS over the successor lists.
//! - The whole store derives `Serialize`/`Deserialize`, so a graph can be
//!   serialized and reloaded with every attribute intact, and `Clone` is the
//!   deep copy the perturbation snapshot uses.

use crate::element::{DependencyKind, NodeRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Attributes carried by a directed predecessor -> child edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Logic relation between the child and its predecessors.
    pub kind: DependencyKind,
    /// Service flow between the two elements.
    pub weight: f64,
}

/// Directed graph of plant elements.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlantGraph {
    /// Live marks in insertion order.
    order: Vec<String>,
    nodes: HashMap<String, NodeRecord>,
    /// mark -> outgoing `(child, edge)` list, in insertion order.
    succ: HashMap<String, Vec<(String, DependencyEdge)>>,
    /// mark -> incoming `(parent, edge)` list, mirror of `succ`.
    pred: HashMap<String, Vec<(String, DependencyEdge)>>,
}

impl PlantGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.succ.values().map(Vec::len).sum()
    }

    /// Edge density `|E| / (|V| * (|V| - 1))`; 0 for graphs with fewer than
    /// two nodes.
    pub fn density(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        self.edge_count() as f64 / (n * (n - 1)) as f64
    }

    pub fn contains(&self, mark: &str) -> bool {
        self.nodes.contains_key(mark)
    }

    /// Insert a node. Re-inserting an existing mark replaces the record and
    /// keeps the incident edges.
    pub fn add_node(&mut self, record: NodeRecord) {
        let mark = record.mark.clone();
        if self.nodes.insert(mark.clone(), record).is_none() {
            self.order.push(mark.clone());
            self.succ.insert(mark.clone(), Vec::new());
            self.pred.insert(mark, Vec::new());
        }
    }

    /// Insert a directed edge `from -> to`. Both endpoints must already be
    /// present; a duplicate edge replaces the previous attributes.
    pub fn add_edge(&mut self, from: &str, to: &str, edge: DependencyEdge) {
        assert!(
            self.contains(from) && self.contains(to),
            "edge endpoints must be inserted before the edge: {from} -> {to}"
        );
        let out = self.succ.get_mut(from).unwrap();
        match out.iter_mut().find(|(m, _)| m == to) {
            Some((_, e)) => *e = edge,
            None => out.push((to.to_string(), edge)),
        }
        let inc = self.pred.get_mut(to).unwrap();
        match inc.iter_mut().find(|(m, _)| m == from) {
            Some((_, e)) => *e = edge,
            None => inc.push((from.to_string(), edge)),
        }
    }

    /// Remove a node and every incident edge. Unknown marks are a no-op.
    pub fn remove_node(&mut self, mark: &str) {
        if self.nodes.remove(mark).is_none() {
            return;
        }
        self.order.retain(|m| m != mark);
        for (child, _) in self.succ.remove(mark).unwrap_or_default() {
            if let Some(inc) = self.pred.get_mut(&child) {
                inc.retain(|(m, _)| m != mark);
            }
        }
        for (parent, _) in self.pred.remove(mark).unwrap_or_default() {
            if let Some(out) = self.succ.get_mut(&parent) {
                out.retain(|(m, _)| m != mark);
            }
        }
    }

    pub fn node(&self, mark: &str) -> Option<&NodeRecord> {
        self.nodes.get(mark)
    }

    pub fn node_mut(&mut self, mark: &str) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(mark)
    }

    /// Live marks in insertion order.
    pub fn marks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Live node records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &NodeRecord> {
        self.order.iter().map(|m| &self.nodes[m])
    }

    /// Mutable access to every live node record. Iteration order is
    /// unspecified; callers use this for attribute writes only.
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut NodeRecord> {
        self.nodes.values_mut()
    }

    /// All edges as `(from, to, edge)` in node insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &DependencyEdge)> {
        self.order.iter().flat_map(|from| {
            self.succ[from]
                .iter()
                .map(move |(to, e)| (from.as_str(), to.as_str(), e))
        })
    }

    /// Outgoing `(child, edge)` pairs of a node.
    pub fn out_edges(&self, mark: &str) -> &[(String, DependencyEdge)] {
        self.succ.get(mark).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming `(parent, edge)` pairs of a node.
    pub fn in_edges(&self, mark: &str) -> &[(String, DependencyEdge)] {
        self.pred.get(mark).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn successors(&self, mark: &str) -> impl Iterator<Item = &str> {
        self.out_edges(mark).iter().map(|(m, _)| m.as_str())
    }

    pub fn predecessors(&self, mark: &str) -> impl Iterator<Item = &str> {
        self.in_edges(mark).iter().map(|(m, _)| m.as_str())
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&DependencyEdge> {
        self.succ
            .get(from)?
            .iter()
            .find(|(m, _)| m == to)
            .map(|(_, e)| e)
    }

    /// Sum of incoming edge weights.
    pub fn in_degree_weighted(&self, mark: &str) -> f64 {
        self.in_edges(mark).iter().map(|(_, e)| e.weight).sum()
    }

    /// Sum of outgoing edge weights.
    pub fn out_degree_weighted(&self, mark: &str) -> f64 {
        self.out_edges(mark).iter().map(|(_, e)| e.weight).sum()
    }

    /// Sum of incident edge weights, both directions.
    pub fn degree_weighted(&self, mark: &str) -> f64 {
        self.in_degree_weighted(mark) + self.out_degree_weighted(mark)
    }

    /// BFS reachability test over directed edges.
    pub fn has_path(&self, from: &str, to: &str) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        if from == to {
            return true;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);
        while let Some(cur) = queue.pop_front() {
            for next in self.successors(cur) {
                if next == to {
                    return true;
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Every simple (no repeated node) directed path `from -> to`, endpoints
    /// included. Returns an empty list when either endpoint is missing or no
    /// path exists.
    pub fn all_simple_paths(&self, from: &str, to: &str) -> Vec<Vec<String>> {
        let mut found = Vec::new();
        if !self.contains(from) || !self.contains(to) {
            return found;
        }
        if from == to {
            found.push(vec![from.to_string()]);
            return found;
        }
        let mut path: Vec<&str> = vec![from];
        let mut on_path: HashSet<&str> = HashSet::from([from]);
        // (node, next successor index) pairs form the DFS stack.
        let mut stack: Vec<(&str, usize)> = vec![(from, 0)];
        loop {
            let Some(&(cur, idx)) = stack.last() else {
                break;
            };
            let out = self.out_edges(cur);
            if let Some((next, _)) = out.get(idx) {
                stack.last_mut().unwrap().1 += 1;
                if next == to {
                    let mut hit: Vec<String> = path.iter().map(|s| s.to_string()).collect();
                    hit.push(to.to_string());
                    found.push(hit);
                } else if !on_path.contains(next.as_str()) {
                    path.push(next.as_str());
                    on_path.insert(next.as_str());
                    stack.push((next.as_str(), 0));
                }
            } else {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(done);
                }
            }
        }
        found
    }
}
