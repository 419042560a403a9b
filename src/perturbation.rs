//! Perturbation orchestrator.
//!
//! [`PlantNetwork`] owns the live [`PlantGraph`] plus the SOURCE/USER
//! rosters captured at construction, and drives the two perturbation
//! workflows:
//! - [`delete_element`](PlantNetwork::delete_element) -- fail one element;
//! - [`simulate_area_perturbation`](PlantNetwork::simulate_area_perturbation)
//!   -- damage every non-resistant element of one or more areas.
//!
//! Both follow the same shape: characterize the intact graph (APSP,
//! efficiencies, centralities), snapshot it, cascade the failure and remove
//! the broken set, characterize the reduced graph onto the snapshot, write
//! the perturbation statuses back, and emit the two result tables. The
//! snapshot is an explicit deep copy: deleted nodes keep their
//! pre-perturbation indicators next to blank final values, survivors carry
//! both sides.
//!
//! Persisting the tables is an I/O concern; see [`crate::io::report`].

use crate::apsp;
use crate::cascade::{self, CascadeState};
use crate::element::{AreaStatus, ElementKind, MarkStatus, NodeRecord, status_code};
use crate::graph::PlantGraph;
use crate::indicators;
use anyhow::{Result, bail};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// One side (pre or post perturbation) of a SOURCE -> USER service check.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSummary {
    /// Every simple path between the pair.
    pub simple_paths: Vec<Vec<String>>,
    /// The reconstructed shortest path.
    pub shortest_path: Vec<String>,
    /// Weighted length of the shortest path.
    pub length: f64,
    /// `1 / length` (0 for a zero-length path).
    pub pair_efficiency: f64,
}

/// Before/after service situation of one (SOURCE, USER) pair. A `None` side
/// means no path existed on that side.
#[derive(Clone, Debug, PartialEq)]
pub struct ServicePathRecord {
    pub from: String,
    pub to: String,
    /// Area of the source element.
    pub area: String,
    /// Pair key: source mark concatenated with user mark.
    pub ids: String,
    pub before: Option<PathSummary>,
    pub after: Option<PathSummary>,
}

/// One row of the node-characterization table, drawn from the annotated
/// snapshot. Field order is the output column order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CharacterizationRecord {
    #[serde(rename = "Mark")]
    pub mark: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "InitStatus")]
    pub init_status: String,
    #[serde(rename = "IntermediateStatus")]
    pub intermediate_status: Option<String>,
    #[serde(rename = "FinalStatus")]
    pub final_status: Option<String>,
    #[serde(rename = "Mark_Status")]
    pub mark_status: Option<String>,
    #[serde(rename = "PerturbationResistant")]
    pub perturbation_resistant: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Status_Area")]
    pub status_area: Option<String>,
    pub closeness_centrality: Option<f64>,
    pub betweenness_centrality: Option<f64>,
    pub indegree_centrality: Option<f64>,
    pub original_local_eff: Option<f64>,
    pub final_local_eff: Option<f64>,
    pub original_global_eff: Option<f64>,
    pub final_global_eff: Option<f64>,
    pub original_avg_global_eff: Option<f64>,
    pub final_avg_global_eff: Option<f64>,
}

impl CharacterizationRecord {
    fn from_node(rec: &NodeRecord) -> Self {
        Self {
            mark: rec.mark.clone(),
            description: rec.description.as_str().to_string(),
            init_status: status_code(rec.init_status).to_string(),
            intermediate_status: rec
                .intermediate_status
                .map(|s| status_code(s).to_string()),
            final_status: rec.final_status.map(|s| status_code(s).to_string()),
            mark_status: rec.mark_status.map(|s| s.as_str().to_string()),
            perturbation_resistant: status_code(rec.perturbation_resistant).to_string(),
            area: rec.area.clone(),
            status_area: rec.status_area.map(|s| s.as_str().to_string()),
            closeness_centrality: rec.closeness_centrality,
            betweenness_centrality: rec.betweenness_centrality,
            indegree_centrality: rec.indegree_centrality,
            original_local_eff: rec.original_local_eff,
            final_local_eff: rec.final_local_eff,
            original_global_eff: rec.original_nodal_eff,
            final_global_eff: rec.final_nodal_eff,
            original_avg_global_eff: rec.original_avg_global_eff,
            final_avg_global_eff: rec.final_avg_global_eff,
        }
    }
}

/// Outcome of one perturbation: the annotated snapshot plus the two result
/// tables.
#[derive(Clone, Debug)]
pub struct PerturbationReport {
    /// Pre-cascade topology carrying both original and final indicators.
    pub snapshot: PlantGraph,
    pub service_paths: Vec<ServicePathRecord>,
    pub characterization: Vec<CharacterizationRecord>,
}

/// `(source, user, summary-if-path-exists)` per roster pair.
type PairSurvey = Vec<(String, String, Option<PathSummary>)>;

/// The live plant network under analysis.
pub struct PlantNetwork {
    graph: PlantGraph,
    sources: Vec<String>,
    users: Vec<String>,
}

impl PlantNetwork {
    /// Wrap a loaded graph, capturing the SOURCE and USER rosters. The
    /// rosters are fixed here: elements removed by a later cascade still
    /// count as service endpoints and show up as `NO_PATH` rows.
    pub fn new(graph: PlantGraph) -> Self {
        let sources = graph
            .records()
            .filter(|r| r.kind == ElementKind::Source)
            .map(|r| r.mark.clone())
            .collect();
        let users = graph
            .records()
            .filter(|r| r.kind == ElementKind::User)
            .map(|r| r.mark.clone())
            .collect();
        Self {
            graph,
            sources,
            users,
        }
    }

    pub fn graph(&self) -> &PlantGraph {
        &self.graph
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Fail one element and cascade the failure. Returns `None` (with a
    /// diagnostic) when the mark is not in the live graph.
    pub fn delete_element(&mut self, mark: &str) -> Option<PerturbationReport> {
        if !self.graph.contains(mark) {
            warn!(node = %mark, "element is not in the graph, insert a valid mark");
            return None;
        }

        let before = self.check_before();
        self.centralities();

        let mut snapshot = self.graph.clone();
        let mut state = CascadeState::new();
        cascade::propagate(&self.graph, &mut state, mark);
        let broken = state.broken_set();
        for n in &broken {
            self.graph.remove_node(n);
        }

        let after = self.check_after(&mut snapshot, &mut state);

        apply_status(
            &mut snapshot,
            &state.intermediate_status,
            StatusField::Intermediate,
            &broken,
        );
        apply_status(&mut snapshot, &state.final_status, StatusField::Final, &broken);
        for node in snapshot.records_mut() {
            node.mark_status = Some(if broken.contains(&node.mark) {
                MarkStatus::NotActive
            } else {
                MarkStatus::Active
            });
            node.status_area = Some(AreaStatus::Available);
        }

        Some(self.build_report(snapshot, before, after))
    }

    /// Damage one or more areas: every non-resistant element located there
    /// fails, each failure cascading in turn. Unknown areas abort the
    /// operation before anything is mutated.
    pub fn simulate_area_perturbation(&mut self, areas: &[String]) -> Result<PerturbationReport> {
        let known: BTreeSet<&str> = self.graph.records().map(|r| r.area.as_str()).collect();
        for area in areas {
            if !known.contains(area.as_str()) {
                bail!(
                    "area {:?} is not in the graph, insert a valid area; valid areas: {:?}",
                    area,
                    known
                );
            }
        }
        let nodes_in_area: Vec<String> = self
            .graph
            .records()
            .filter(|r| areas.contains(&r.area))
            .map(|r| r.mark.clone())
            .collect();

        let before = self.check_before();
        self.centralities();

        let mut snapshot = self.graph.clone();
        let mut state = CascadeState::new();
        let failing: Vec<String> = nodes_in_area
            .iter()
            .filter(|m| !self.graph.node(m).unwrap().perturbation_resistant)
            .cloned()
            .collect();

        for node in &failing {
            if !self.graph.contains(node) {
                continue; // already taken out by an earlier cascade
            }
            state.broken.clear();
            cascade::propagate(&self.graph, &mut state, node);
            for n in &state.broken_set() {
                self.graph.remove_node(n);
            }
        }

        let after = self.check_after(&mut snapshot, &mut state);

        let in_area: BTreeSet<String> = nodes_in_area.into_iter().collect();
        apply_status(
            &mut snapshot,
            &state.intermediate_status,
            StatusField::Intermediate,
            &in_area,
        );
        apply_status(&mut snapshot, &state.final_status, StatusField::Final, &in_area);

        let alive: BTreeSet<String> = self.graph.marks().map(str::to_string).collect();
        for node in snapshot.records_mut() {
            node.mark_status = Some(if alive.contains(&node.mark) {
                MarkStatus::Active
            } else {
                MarkStatus::NotActive
            });
            node.status_area = Some(if areas.contains(&node.area) {
                AreaStatus::Damaged
            } else {
                AreaStatus::Available
            });
        }

        Ok(self.build_report(snapshot, before, after))
    }

    /// Characterize the intact graph: APSP, nodal/global/local efficiency,
    /// and the pre-perturbation service survey.
    fn check_before(&mut self) -> PairSurvey {
        apsp::compute_shortest_paths(&mut self.graph);
        indicators::nodal_efficiency(&mut self.graph);
        indicators::average_global_efficiency(&mut self.graph);
        indicators::local_efficiency(&mut self.graph);
        survey_pairs(&self.graph, &self.sources, &self.users)
    }

    /// Characterize the reduced graph onto the snapshot and run the
    /// post-perturbation service survey, re-opening closed valves found on
    /// surviving service routes.
    fn check_after(&mut self, snapshot: &mut PlantGraph, state: &mut CascadeState) -> PairSurvey {
        apsp::compute_shortest_paths(&mut self.graph);
        indicators::final_nodal_efficiency(&self.graph, snapshot);
        indicators::final_average_global_efficiency(&self.graph, snapshot);
        indicators::final_local_efficiency(&self.graph, snapshot);

        let mut survey = Vec::with_capacity(self.sources.len() * self.users.len());
        for src in &self.sources {
            for user in &self.users {
                let summary = if self.graph.contains(src)
                    && self.graph.contains(user)
                    && self.graph.has_path(src, user)
                {
                    let simple_paths = self.graph.all_simple_paths(src, user);
                    reconcile_valves(&self.graph, &simple_paths, state);
                    Some(summarize(&self.graph, src, user, simple_paths))
                } else {
                    None
                };
                survey.push((src.clone(), user.clone(), summary));
            }
        }
        survey
    }

    /// All five centrality indicators, on the live graph.
    fn centralities(&mut self) {
        indicators::closeness_centrality(&mut self.graph);
        indicators::betweenness_centrality(&mut self.graph);
        indicators::indegree_centrality(&mut self.graph);
        indicators::outdegree_centrality(&mut self.graph);
        indicators::degree_centrality(&mut self.graph);
    }

    fn build_report(
        &self,
        snapshot: PlantGraph,
        before: PairSurvey,
        after: PairSurvey,
    ) -> PerturbationReport {
        let service_paths = before
            .into_iter()
            .zip(after)
            .map(|((src, user, b), (_, _, a))| ServicePathRecord {
                ids: format!("{src}{user}"),
                area: snapshot
                    .node(&src)
                    .map(|r| r.area.clone())
                    .unwrap_or_default(),
                from: src,
                to: user,
                before: b,
                after: a,
            })
            .collect();
        let characterization = snapshot
            .records()
            .map(CharacterizationRecord::from_node)
            .collect();
        PerturbationReport {
            snapshot,
            service_paths,
            characterization,
        }
    }
}

/// Survey every roster pair on the given graph.
fn survey_pairs(g: &PlantGraph, sources: &[String], users: &[String]) -> PairSurvey {
    let mut survey = Vec::with_capacity(sources.len() * users.len());
    for src in sources {
        for user in users {
            let summary = if g.contains(src) && g.contains(user) && g.has_path(src, user) {
                Some(summarize(g, src, user, g.all_simple_paths(src, user)))
            } else {
                None
            };
            survey.push((src.clone(), user.clone(), summary));
        }
    }
    survey
}

fn summarize(g: &PlantGraph, src: &str, user: &str, simple_paths: Vec<Vec<String>>) -> PathSummary {
    let node = g.node(src).expect("surveyed source is live");
    let shortest_path = node.shortest_path[user].clone();
    let length = node.shpath_length[user];
    PathSummary {
        simple_paths,
        shortest_path,
        length,
        pair_efficiency: if length != 0.0 { 1.0 / length } else { 0.0 },
    }
}

/// Re-open every closed valve sitting on a surviving service route: the
/// operator restores flow through routes that the cascade left intact.
fn reconcile_valves(g: &PlantGraph, simple_paths: &[Vec<String>], state: &mut CascadeState) {
    let on_routes: BTreeSet<&str> = simple_paths
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    for mark in on_routes {
        let node = g.node(mark).expect("path node is live");
        if !node.description.is_valve() {
            continue;
        }
        let currently_open = match state.intermediate_status.get(mark) {
            Some(&status) => status,
            None => node.init_status,
        };
        if currently_open {
            debug!(
                valve = %node.description,
                node = %mark,
                state = node.description.valve_state(true).unwrap(),
                "valve already open on service route"
            );
        } else {
            state.final_status.insert(mark.to_string(), true);
            debug!(
                valve = %node.description,
                node = %mark,
                from = node.description.valve_state(false).unwrap(),
                to = node.description.valve_state(true).unwrap(),
                "valve re-opened on service route"
            );
        }
    }
}

enum StatusField {
    Intermediate,
    Final,
}

/// Write a recorded status map onto the snapshot: nodes in the map (and not
/// in the exclusion list) get their recorded value, everyone else goes
/// blank. The exclusion list holds nodes whose fate the perturbation itself
/// already decided.
fn apply_status(
    snapshot: &mut PlantGraph,
    status: &BTreeMap<String, bool>,
    field: StatusField,
    exclude: &BTreeSet<String>,
) {
    for node in snapshot.records_mut() {
        let value = if exclude.contains(&node.mark) {
            None
        } else {
            status.get(&node.mark).copied()
        };
        match field {
            StatusField::Intermediate => node.intermediate_status = value,
            StatusField::Final => node.final_status = value,
        }
    }
}
