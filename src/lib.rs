//! # Plantnet
//!
//! **Perturbation analysis for industrial-plant dependency networks.**
//! Plantnet models a plant as a directed graph -- nodes are elements
//! (sources, hubs, users, isolating valves), edges carry the logic relation
//! to a predecessor (`SINGLE`, `AND`, `OR`, `ORPHAN`) and the service flow --
//! computes graph-theoretic indicators, and simulates how a failure
//! propagates through the predecessor logic.
//!
//! ## Key Features
//!
//! - **All-pairs shortest paths** -- dense Floyd-Warshall and sparse
//!   multi-source Dijkstra back-ends, each serial and parallel, chosen
//!   automatically by graph size and density
//! - **Efficiency indicators** -- nodal, local and average global efficiency
//! - **Centralities** -- betweenness, closeness and weighted
//!   in-/out-/total-degree centrality
//! - **Cascade engine** -- depth-first failure propagation honoring
//!   AND/OR/SINGLE predecessor logic and isolation-valve state
//! - **Perturbation workflows** -- single-element failure and multi-area
//!   damage, each producing a before/after characterization
//! - **CSV surface** -- topology input, Gephi check dumps and the two
//!   result tables
//!
//! ## Quick Start
//!
//! ```no_run
//! use plantnet::io::{loader, report};
//! use plantnet::PlantNetwork;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let graph = loader::load_graph("plant.csv")?;
//! let mut network = PlantNetwork::new(graph);
//!
//! if let Some(rep) = network.delete_element("PUMP_1") {
//!     report::write_characterization(&rep.characterization, "element_perturbation.csv")?;
//!     report::write_service_paths(&rep.service_paths, "service_paths_element_perturbation.csv")?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### `PlantGraph`
//!
//! A [`PlantGraph`] is the directed store of [`NodeRecord`]s and
//! [`DependencyEdge`]s. It preserves insertion order, supports node removal
//! with incident-edge cleanup, and clones deeply -- the perturbation
//! workflows snapshot it before mutating.
//!
//! ### Indicators
//!
//! [`apsp::compute_shortest_paths`] refreshes every node's shortest-path,
//! length and efficiency attributes; the [`indicators`] module derives nodal
//! / local / global efficiency and the centralities from them. Before a
//! perturbation they land in the `original_*` fields of the live graph,
//! afterwards in the `final_*` fields of the snapshot (deleted nodes stay
//! blank).
//!
//! ### Perturbations
//!
//! A [`PlantNetwork`] runs the workflows:
//! - [`PlantNetwork::delete_element`] fails one element;
//! - [`PlantNetwork::simulate_area_perturbation`] fails every non-resistant
//!   element of the given areas.
//!
//! Both cascade the failure ([`cascade`]), remove the broken set, recompute
//! the indicators and return a [`PerturbationReport`]: the annotated
//! snapshot plus the service-path and node-characterization tables.
//!
//! ## Execution Model
//!
//! Everything runs to completion on OS threads; there is no async runtime.
//! The orchestrator is single-threaded -- parallelism lives in the APSP
//! back-ends (row-banded Floyd-Warshall behind a barrier, chunked Dijkstra
//! workers behind a bounded channel) and the rayon-powered centrality
//! sweeps. One worker per hardware thread.
//!
//! ## Module Overview
//!
//! - [`graph`] - the `PlantGraph` store
//! - [`element`] - typed node/edge attribute records
//! - [`apsp`] - shortest-path engine and back-end selection
//! - [`indicators`] - efficiency and centrality calculators
//! - [`cascade`] - failure propagation
//! - [`perturbation`] - the `PlantNetwork` workflows and result tables
//! - [`io`] - CSV loading and report writing
//! - [`testing`] - builders, fixtures and assertions for tests
//! - [`utils`] - `OrdF64`, range splitting

pub mod apsp;
pub mod cascade;
pub mod element;
pub mod graph;
pub mod indicators;
pub mod io;
pub mod perturbation;
pub mod testing;
pub mod utils;

// General re-exports
pub use apsp::{Backend, compute_shortest_paths, compute_shortest_paths_with};
pub use cascade::CascadeState;
pub use element::{
    AreaStatus, DependencyKind, Description, ElementKind, MarkStatus, NodeRecord,
};
pub use graph::{DependencyEdge, PlantGraph};
pub use io::loader::load_graph;
pub use perturbation::{
    CharacterizationRecord, PathSummary, PerturbationReport, PlantNetwork, ServicePathRecord,
};
pub use utils::OrdF64;
