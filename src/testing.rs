//! Testing utilities: a fluent graph builder, canned plant topologies and
//! float assertions for the integration tests.
//!
//! # Example
//!
//! ```
//! use plantnet::testing::*;
//! use plantnet::{DependencyKind, ElementKind};
//!
//! let g = GraphBuilder::new()
//!     .node("A", ElementKind::Source)
//!     .node("B", ElementKind::User)
//!     .edge("A", "B", DependencyKind::Single, 1.0)
//!     .build();
//! assert!(g.has_path("A", "B"));
//! ```

use crate::element::{DependencyKind, Description, ElementKind, NodeRecord};
use crate::graph::{DependencyEdge, PlantGraph};

/// Fluent builder for test topologies. Non-valve nodes default to an open
/// status, no perturbation resistance and area `"area1"`.
#[derive(Default)]
pub struct GraphBuilder {
    graph: PlantGraph,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain (non-valve) element.
    #[must_use]
    pub fn node(mut self, mark: &str, kind: ElementKind) -> Self {
        self.graph.add_node(NodeRecord::new(
            mark,
            Description::Other("element".to_string()),
            true,
            false,
            "area1",
            kind,
        ));
        self
    }

    /// Add an isolating element with the given description and status.
    #[must_use]
    pub fn valve(mut self, mark: &str, description: Description, init_status: bool) -> Self {
        self.graph.add_node(NodeRecord::new(
            mark,
            description,
            init_status,
            false,
            "area1",
            ElementKind::Hub,
        ));
        self
    }

    /// Move an already-added element into `area`.
    #[must_use]
    pub fn in_area(mut self, mark: &str, area: &str) -> Self {
        self.graph.node_mut(mark).expect("node added before in_area").area = area.to_string();
        self
    }

    /// Flag an already-added element as perturbation resistant.
    #[must_use]
    pub fn resistant(mut self, mark: &str) -> Self {
        self.graph
            .node_mut(mark)
            .expect("node added before resistant")
            .perturbation_resistant = true;
        self
    }

    #[must_use]
    pub fn edge(mut self, from: &str, to: &str, kind: DependencyKind, weight: f64) -> Self {
        self.graph.add_edge(from, to, DependencyEdge { kind, weight });
        self
    }

    /// Build and return the finished topology.
    #[must_use]
    pub fn build(self) -> PlantGraph {
        self.graph
    }
}

/// `A -> B -> C -> D`, all SINGLE edges of weight 1; `A` is a SOURCE, `D` a
/// USER.
pub fn chain_graph() -> PlantGraph {
    GraphBuilder::new()
        .node("A", ElementKind::Source)
        .node("B", ElementKind::Hub)
        .node("C", ElementKind::Hub)
        .node("D", ElementKind::User)
        .edge("A", "B", DependencyKind::Single, 1.0)
        .edge("B", "C", DependencyKind::Single, 1.0)
        .edge("C", "D", DependencyKind::Single, 1.0)
        .build()
}

/// Two SOURCEs `A`, `B` feeding USER `C` over OR edges of weight 1.
pub fn or_pair_graph() -> PlantGraph {
    GraphBuilder::new()
        .node("A", ElementKind::Source)
        .node("B", ElementKind::Source)
        .node("C", ElementKind::User)
        .edge("A", "C", DependencyKind::Or, 1.0)
        .edge("B", "C", DependencyKind::Or, 1.0)
        .build()
}

/// Two SOURCEs `A`, `B` feeding USER `C` over AND edges of weight 1.
pub fn and_pair_graph() -> PlantGraph {
    GraphBuilder::new()
        .node("A", ElementKind::Source)
        .node("B", ElementKind::Source)
        .node("C", ElementKind::User)
        .edge("A", "C", DependencyKind::And, 1.0)
        .edge("B", "C", DependencyKind::And, 1.0)
        .build()
}

/// SOURCE `S` -> closed `isolation_A` valve `V` -> USER `U`.
pub fn valve_line_graph() -> PlantGraph {
    GraphBuilder::new()
        .node("S", ElementKind::Source)
        .valve("V", Description::IsolationA, true)
        .node("U", ElementKind::User)
        .edge("S", "V", DependencyKind::Single, 1.0)
        .edge("V", "U", DependencyKind::Single, 1.0)
        .build()
}

/// Two areas: `a1` holds SOURCE `S1 -> H1 -> U1` (USER), `a2` holds SOURCE
/// `S2 -> U2` (USER). Nothing is perturbation resistant.
pub fn two_area_graph() -> PlantGraph {
    GraphBuilder::new()
        .node("S1", ElementKind::Source)
        .node("H1", ElementKind::Hub)
        .node("U1", ElementKind::User)
        .node("S2", ElementKind::Source)
        .node("U2", ElementKind::User)
        .in_area("S2", "a2")
        .in_area("U2", "a2")
        .in_area("S1", "a1")
        .in_area("H1", "a1")
        .in_area("U1", "a1")
        .edge("S1", "H1", DependencyKind::Single, 1.0)
        .edge("H1", "U1", DependencyKind::Single, 1.0)
        .edge("S2", "U2", DependencyKind::Single, 1.0)
        .build()
}

/// Deterministic sparse graph with `n` nodes (`n0` .. `n{n-1}`) and a
/// couple of arithmetic out-edges per node. Weights cycle over 1..=5.
pub fn sparse_graph(n: usize) -> PlantGraph {
    let mut b = GraphBuilder::new();
    for i in 0..n {
        let kind = match i % 7 {
            0 => ElementKind::Source,
            6 => ElementKind::User,
            _ => ElementKind::Hub,
        };
        b = b.node(&format!("n{i}"), kind);
    }
    let mut g = b.build();
    for i in 0..n {
        let from = format!("n{i}");
        for hop in [1usize, 7, 13] {
            let j = (i * hop + hop) % n;
            if j == i {
                continue;
            }
            let weight = ((i + hop) % 5 + 1) as f64;
            g.add_edge(
                &from,
                &format!("n{j}"),
                DependencyEdge {
                    kind: DependencyKind::Single,
                    weight,
                },
            );
        }
    }
    g
}

/// Assert two floats agree within `tol`.
///
/// # Panics
/// Panics with both values when they differ by more than `tol`.
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "float mismatch:\n  Expected: {expected}\n  Actual: {actual}\n  Tolerance: {tol}"
    );
}

/// Assert an optional indicator is present and agrees within `tol`.
pub fn assert_opt_close(actual: Option<f64>, expected: f64, tol: f64) {
    match actual {
        Some(a) => assert_close(a, expected, tol),
        None => panic!("expected Some({expected}), got None"),
    }
}
