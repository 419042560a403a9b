//! Failure-propagation engine.
//!
//! A perturbation breaks a starting element; the failure then travels down
//! the successor edges, interpreted through each element's predecessor
//! logic:
//! - `SINGLE` / `AND` / `ORPHAN` children break as soon as the cascade
//!   reaches them (one lost predecessor is enough, or there was none).
//! - `OR` children survive while at least one predecessor is still intact;
//!   they break only when started at directly, or when the last intact
//!   predecessor goes.
//! - Isolating valves stop the cascade: a valve reached mid-cascade records
//!   its state transition (open -> closed) but is not broken and is not
//!   descended through. A valve the perturbation starts at breaks like any
//!   origin.
//!
//! The traversal is a depth-first walk with an explicit stack, so deep
//! supply chains cannot overflow the call stack. [`CascadeState`] survives
//! across propagations within one perturbation: area damage runs one
//! propagation per failing element against the same state.

use crate::element::DependencyKind;
use crate::graph::PlantGraph;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Mutable cascade bookkeeping shared by every propagation of one
/// perturbation.
#[derive(Clone, Debug, Default)]
pub struct CascadeState {
    /// Marks broken so far, in discovery order, possibly with duplicates.
    pub broken: Vec<String>,
    /// Valves whose state flipped during propagation (mark -> new status).
    pub intermediate_status: BTreeMap<String, bool>,
    /// Valves re-opened by the post-cascade path check (mark -> new status).
    pub final_status: BTreeMap<String, bool>,
}

impl CascadeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The deduplicated broken set.
    pub fn broken_set(&self) -> BTreeSet<String> {
        self.broken.iter().cloned().collect()
    }
}

/// Propagate a failure starting at `start`, marking broken elements and
/// recording valve transitions in `state`. The graph itself is not touched;
/// the caller removes [`CascadeState::broken_set`] afterwards.
pub fn propagate(g: &PlantGraph, state: &mut CascadeState, start: &str) {
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = vec![start.to_string()];

    while let Some(mark) = stack.pop() {
        if !visited.insert(mark.clone()) {
            continue;
        }
        debug!(node = %mark, visited = visited.len(), "cascade visiting");
        let Some(node) = g.node(&mark) else { continue };
        let origin = visited.len() == 1;

        let descend = if node.description.is_valve() {
            if node.init_status {
                state.intermediate_status.insert(mark.clone(), false);
                debug!(
                    valve = %node.description,
                    node = %mark,
                    from = node.description.valve_state(true).unwrap(),
                    to = node.description.valve_state(false).unwrap(),
                    "valve transition"
                );
            } else {
                debug!(
                    valve = %node.description,
                    node = %mark,
                    state = node.description.valve_state(false).unwrap(),
                    "valve unchanged"
                );
            }
            if origin {
                state.broken.push(mark.clone());
                true
            } else {
                // The valve isolates the cascade.
                false
            }
        } else {
            let preds: Vec<&str> = g.predecessors(&mark).collect();
            let representative = preds
                .first()
                .and_then(|p| g.edge(p, &mark))
                .map(|e| e.kind)
                .unwrap_or(DependencyKind::Single);
            let broken_preds = preds
                .iter()
                .filter(|&&p| state.broken.iter().any(|b| b == p))
                .count();

            if representative != DependencyKind::Or
                || origin
                || preds.len() == broken_preds
            {
                state.broken.push(mark.clone());
                debug!(node = %mark, broken = state.broken.len(), "element broken");
                true
            } else {
                // An intact predecessor keeps this OR element alive.
                false
            }
        };

        if descend {
            for succ in g.successors(&mark) {
                if !visited.contains(succ) {
                    stack.push(succ.to_string());
                }
            }
        }
    }
}
