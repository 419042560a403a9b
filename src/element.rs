//! Typed attribute records for plant elements and dependency edges.
//!
//! This module defines:
//! - [`NodeRecord`]: the per-element attribute record (loaded fields plus
//!   every indicator computed later).
//! - [`DependencyKind`]: the logic relation carried by an edge (`SINGLE`,
//!   `AND`, `OR`, `ORPHAN`).
//! - [`ElementKind`]: the commodity role of an element (`SOURCE`, `HUB`,
//!   `USER`).
//! - [`Description`]: the element description, with the three valve
//!   descriptions (`isolation_A`, `isolation_B`, `unknown`) recognized
//!   specially.
//!
//! # Notes
//! * Electrical/mechanical statuses travel as `"0"`/`"1"` strings in the CSV
//!   surface; inside the crate they are `bool` (`"1"` is `true`). Blank
//!   statuses are `Option::None`.
//! * Attribute bags are typed records, not string maps: an unknown attribute
//!   is a compile error, an unknown enum value is a load error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logic relation between an element and one of its predecessors.
///
/// - `Single`: the only predecessor of the element.
/// - `And`: all predecessors are necessary for the element to function.
/// - `Or`: one functioning predecessor is enough.
/// - `Orphan`: the element has no predecessor (declaration-only rows).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyKind {
    Single,
    And,
    Or,
    Orphan,
}

impl DependencyKind {
    /// Parse the CSV spelling (`SINGLE`, `AND`, `OR`, `ORPHAN`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SINGLE" => Some(Self::Single),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "ORPHAN" => Some(Self::Orphan),
            _ => None,
        }
    }

    /// The CSV spelling of this relation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Orphan => "ORPHAN",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commodity role of an element in the plant hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ElementKind {
    Source,
    Hub,
    User,
}

impl ElementKind {
    /// Parse the CSV spelling (`SOURCE`, `HUB`, `USER`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SOURCE" => Some(Self::Source),
            "HUB" => Some(Self::Hub),
            "USER" => Some(Self::User),
            _ => None,
        }
    }

    /// The CSV spelling of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Hub => "HUB",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element description. `isolation_A`, `isolation_B` and `unknown` mark
/// isolating elements; anything else is free-form descriptive text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Description {
    IsolationA,
    IsolationB,
    Unknown,
    Other(String),
}

impl Description {
    /// True for the three isolating-valve descriptions. A valve stops
    /// cascade propagation and toggles state when the cascade reaches it.
    pub fn is_valve(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Human-readable state name for a valve in the given status, per the
    /// valve semantics table:
    ///
    /// | description | status `"0"` | status `"1"` |
    /// |---|---|---|
    /// | isolation_A | OPEN | CLOSED |
    /// | isolation_B | CLOSED | OPEN |
    /// | unknown | OFF | ON |
    ///
    /// Returns `None` for non-valve descriptions.
    pub fn valve_state(&self, status: bool) -> Option<&'static str> {
        match (self, status) {
            (Self::IsolationA, false) => Some("OPEN"),
            (Self::IsolationA, true) => Some("CLOSED"),
            (Self::IsolationB, false) => Some("CLOSED"),
            (Self::IsolationB, true) => Some("OPEN"),
            (Self::Unknown, false) => Some("OFF"),
            (Self::Unknown, true) => Some("ON"),
            (Self::Other(_), _) => None,
        }
    }

    /// The CSV spelling of this description.
    pub fn as_str(&self) -> &str {
        match self {
            Self::IsolationA => "isolation_A",
            Self::IsolationB => "isolation_B",
            Self::Unknown => "unknown",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Description {
    fn from(s: String) -> Self {
        match s.as_str() {
            "isolation_A" => Self::IsolationA,
            "isolation_B" => Self::IsolationB,
            "unknown" => Self::Unknown,
            _ => Self::Other(s),
        }
    }
}

impl From<Description> for String {
    fn from(d: Description) -> Self {
        d.as_str().to_string()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an element survived the perturbation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkStatus {
    Active,
    NotActive,
}

impl MarkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::NotActive => "NOT_ACTIVE",
        }
    }
}

impl fmt::Display for MarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the element's spatial area was hit by the perturbation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaStatus {
    Available,
    Damaged,
}

impl AreaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Damaged => "DAMAGED",
        }
    }
}

impl fmt::Display for AreaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `"0"`/`"1"` status field.
pub fn parse_status(s: &str) -> Option<bool> {
    match s {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

/// Render a status as its `"0"`/`"1"` CSV spelling.
pub fn status_code(status: bool) -> &'static str {
    if status { "1" } else { "0" }
}

/// Per-element attribute record.
///
/// The first block holds the loaded attributes; the rest is computed state,
/// written by the APSP engine, the indicator calculator and the perturbation
/// orchestrator. Computed fields start out empty (`None` / empty maps) and a
/// `None` serializes to a blank CSV field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique element identifier.
    pub mark: String,
    pub description: Description,
    /// Electrical/mechanical open-closed state at load time.
    pub init_status: bool,
    pub perturbation_resistant: bool,
    /// Opaque spatial-area label.
    pub area: String,
    pub kind: ElementKind,

    // Perturbation state, written back onto the snapshot.
    pub intermediate_status: Option<bool>,
    pub final_status: Option<bool>,
    pub mark_status: Option<MarkStatus>,
    pub status_area: Option<AreaStatus>,

    // Shortest-path state, refreshed by every APSP run.
    /// Reachable target -> node sequence (both endpoints included).
    pub shortest_path: BTreeMap<String, Vec<String>>,
    /// Reachable target -> weighted path length.
    pub shpath_length: BTreeMap<String, f64>,
    /// One `(target, 1/length)` entry per reachable target (0 when the
    /// length is 0, i.e. the trivial self path).
    pub efficiency: Vec<(String, f64)>,

    // Efficiency and centrality indicators.
    pub original_nodal_eff: Option<f64>,
    pub final_nodal_eff: Option<f64>,
    pub original_local_eff: Option<f64>,
    pub final_local_eff: Option<f64>,
    pub original_avg_global_eff: Option<f64>,
    pub final_avg_global_eff: Option<f64>,
    pub closeness_centrality: Option<f64>,
    pub betweenness_centrality: Option<f64>,
    pub indegree_centrality: Option<f64>,
    pub outdegree_centrality: Option<f64>,
    pub degree_centrality: Option<f64>,
}

impl NodeRecord {
    /// A fresh record with the loaded attributes and no computed state.
    pub fn new(
        mark: impl Into<String>,
        description: Description,
        init_status: bool,
        perturbation_resistant: bool,
        area: impl Into<String>,
        kind: ElementKind,
    ) -> Self {
        Self {
            mark: mark.into(),
            description,
            init_status,
            perturbation_resistant,
            area: area.into(),
            kind,
            intermediate_status: None,
            final_status: None,
            mark_status: None,
            status_area: None,
            shortest_path: Default::default(),
            shpath_length: Default::default(),
            efficiency: Vec::new(),
            original_nodal_eff: None,
            final_nodal_eff: None,
            original_local_eff: None,
            final_local_eff: None,
            original_avg_global_eff: None,
            final_avg_global_eff: None,
            closeness_centrality: None,
            betweenness_centrality: None,
            indegree_centrality: None,
            outdegree_centrality: None,
            degree_centrality: None,
        }
    }
}
