//! Input CSV parsing and Gephi check dumps.
//!
//! Each input row describes one element and (unless `Father_mark` is the
//! literal `NULL`) one edge from its predecessor:
//!
//! ```text
//! Mark,Father_mark,Father_cond,Description,InitStatus,Area,PerturbationResistant,Type,Service
//! ```
//!
//! A mark seen again on a later row updates the same node, so an element
//! with several predecessors appears once per incoming edge. Rows are
//! validated strictly: a missing field, a non-numeric or negative `Service`,
//! an unknown `Father_cond`/`Type` or a status outside `"0"`/`"1"` rejects
//! the whole load with the offending record number, and nothing is returned.

use crate::element::{DependencyKind, Description, ElementKind, NodeRecord, parse_status, status_code};
use crate::graph::{DependencyEdge, PlantGraph};
use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::fs::{File, create_dir_all};
use std::path::Path;
use tracing::info;

/// One raw input row.
#[derive(Clone, Debug, Deserialize)]
struct PlantRow {
    #[serde(rename = "Mark")]
    mark: String,
    #[serde(rename = "Father_mark")]
    father_mark: String,
    #[serde(rename = "Father_cond")]
    father_cond: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "InitStatus")]
    init_status: String,
    #[serde(rename = "Area")]
    area: String,
    #[serde(rename = "PerturbationResistant")]
    perturbation_resistant: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "Service")]
    service: String,
}

/// Load a plant topology from a comma-delimited CSV with a header row.
///
/// # Errors
/// Returns an error if the file cannot be opened, any row fails to parse or
/// validate, or a node ends up with mixed `OR`/non-`OR` incoming conditions.
pub fn load_graph(path: impl AsRef<Path>) -> Result<PlantGraph> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(f);

    let mut g = PlantGraph::new();
    for (i, rec) in rdr.deserialize::<PlantRow>().enumerate() {
        let row = rec.with_context(|| format!("parse CSV record #{}", i + 1))?;
        insert_row(&mut g, row).with_context(|| format!("invalid CSV record #{}", i + 1))?;
    }
    validate_conditions(&g)?;

    info!(
        nodes = g.len(),
        edges = g.edge_count(),
        "plant topology loaded"
    );
    Ok(g)
}

fn insert_row(g: &mut PlantGraph, row: PlantRow) -> Result<()> {
    let description = Description::from(row.description);
    let init_status = parse_status(&row.init_status)
        .ok_or_else(|| anyhow!("InitStatus must be \"0\" or \"1\", got {:?}", row.init_status))?;
    let resistant = parse_status(&row.perturbation_resistant).ok_or_else(|| {
        anyhow!(
            "PerturbationResistant must be \"0\" or \"1\", got {:?}",
            row.perturbation_resistant
        )
    })?;
    let kind = ElementKind::parse(&row.kind)
        .ok_or_else(|| anyhow!("unknown Type {:?}", row.kind))?;

    if let Some(node) = g.node_mut(&row.mark) {
        // A repeated mark updates the element in place.
        node.description = description;
        node.init_status = init_status;
        node.perturbation_resistant = resistant;
        node.area = row.area;
        node.kind = kind;
    } else {
        g.add_node(NodeRecord::new(
            row.mark.clone(),
            description,
            init_status,
            resistant,
            row.area,
            kind,
        ));
    }

    if row.father_mark == "NULL" {
        // Root declaration, no edge to materialize.
        return Ok(());
    }

    let cond = DependencyKind::parse(&row.father_cond)
        .ok_or_else(|| anyhow!("unknown Father_cond {:?}", row.father_cond))?;
    let weight: f64 = row
        .service
        .trim()
        .parse()
        .with_context(|| format!("non-numeric Service {:?}", row.service))?;
    if weight < 0.0 {
        bail!("Service must be non-negative, got {weight}");
    }

    if !g.contains(&row.father_mark) {
        // The predecessor's own row may come later; start it as a bare
        // placeholder that its row will overwrite.
        g.add_node(NodeRecord::new(
            row.father_mark.clone(),
            Description::Other(String::new()),
            false,
            false,
            String::new(),
            ElementKind::Hub,
        ));
    }
    g.add_edge(&row.father_mark, &row.mark, DependencyEdge { kind: cond, weight });
    Ok(())
}

/// Reject nodes whose incoming edges mix `OR` with non-`OR` conditions; the
/// cascade rules are undefined on such input.
fn validate_conditions(g: &PlantGraph) -> Result<()> {
    for mark in g.marks() {
        let kinds: Vec<DependencyKind> = g.in_edges(mark).iter().map(|(_, e)| e.kind).collect();
        let or_count = kinds.iter().filter(|k| **k == DependencyKind::Or).count();
        if or_count > 0 && or_count < kinds.len() {
            bail!(
                "node {:?} mixes OR with non-OR incoming conditions ({:?})",
                mark,
                kinds
            );
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct GephiNodeRow<'a> {
    #[serde(rename = "Mark")]
    mark: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "InitStatus")]
    init_status: &'a str,
    #[serde(rename = "PerturbationResistant")]
    perturbation_resistant: &'a str,
    #[serde(rename = "Area")]
    area: &'a str,
}

#[derive(Serialize)]
struct GephiEdgeRow<'a> {
    #[serde(rename = "Mark")]
    mark: &'a str,
    #[serde(rename = "Father_mark")]
    father_mark: &'a str,
}

/// Dump `check_import_nodes.csv` and `check_import_edges.csv` into
/// `out_dir` so the loaded topology can be eyeballed with Gephi.
pub fn check_input_with_gephi(g: &PlantGraph, out_dir: impl AsRef<Path>) -> Result<()> {
    let out_dir = out_dir.as_ref();
    if !out_dir.as_os_str().is_empty() {
        create_dir_all(out_dir).with_context(|| format!("mkdir -p {}", out_dir.display()))?;
    }

    let nodes_path = out_dir.join("check_import_nodes.csv");
    let mut wtr = csv::Writer::from_path(&nodes_path)
        .with_context(|| format!("create {}", nodes_path.display()))?;
    for rec in g.records() {
        wtr.serialize(GephiNodeRow {
            mark: &rec.mark,
            description: rec.description.as_str(),
            init_status: status_code(rec.init_status),
            perturbation_resistant: status_code(rec.perturbation_resistant),
            area: &rec.area,
        })?;
    }
    wtr.flush()?;

    let edges_path = out_dir.join("check_import_edges.csv");
    let mut wtr = csv::Writer::from_path(&edges_path)
        .with_context(|| format!("create {}", edges_path.display()))?;
    for mark in g.marks() {
        for father in g.predecessors(mark) {
            wtr.serialize(GephiEdgeRow {
                mark,
                father_mark: father,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
