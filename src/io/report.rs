//! Output CSV writers for perturbation reports.
//!
//! Two tables come out of a perturbation:
//! - **node characterization** (`element_perturbation.csv` /
//!   `area_perturbation.csv`): one row per snapshot node with statuses,
//!   centralities and efficiencies;
//! - **service paths** (`service_paths_element_perturbation.csv` /
//!   `service_paths_multi_area_perturbation.csv`): one row per
//!   (SOURCE, USER) pair with the original and final path situation.
//!
//! Missing paths serialize as the literal `NO_PATH` in every path-valued
//! field; blank statuses and efficiencies serialize as empty cells. Node
//! sequences render as `A -> B -> C`, simple-path alternatives joined with
//! `; `.

use crate::perturbation::{CharacterizationRecord, PathSummary, ServicePathRecord};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::create_dir_all;
use std::path::Path;

/// Sentinel written to path-valued fields of pairs without a path.
pub const NO_PATH: &str = "NO_PATH";

/// Flat CSV shape of one service-path row. Field order is the output column
/// order (the `original_simple path` header spelling is inherited from the
/// historical format).
#[derive(Serialize)]
struct ServicePathRow {
    from: String,
    to: String,
    final_simple_path: String,
    final_shortest_path: String,
    final_shortest_path_length: String,
    final_pair_efficiency: String,
    area: String,
    ids: String,
    #[serde(rename = "original_simple path")]
    original_simple_path: String,
    original_shortest_path_length: String,
    original_pair_efficiency: String,
    original_shortest_path: String,
}

impl ServicePathRow {
    fn from_record(rec: &ServicePathRecord) -> Self {
        let (osip, oshp, oshpl, oeff) = render_side(rec.before.as_ref());
        let (fsip, fshp, fshpl, feff) = render_side(rec.after.as_ref());
        Self {
            from: rec.from.clone(),
            to: rec.to.clone(),
            final_simple_path: fsip,
            final_shortest_path: fshp,
            final_shortest_path_length: fshpl,
            final_pair_efficiency: feff,
            area: rec.area.clone(),
            ids: rec.ids.clone(),
            original_simple_path: osip,
            original_shortest_path_length: oshpl,
            original_pair_efficiency: oeff,
            original_shortest_path: oshp,
        }
    }
}

/// `(simple paths, shortest path, length, efficiency)` as CSV strings.
fn render_side(side: Option<&PathSummary>) -> (String, String, String, String) {
    match side {
        Some(s) => (
            render_simple_paths(&s.simple_paths),
            render_path(&s.shortest_path),
            s.length.to_string(),
            s.pair_efficiency.to_string(),
        ),
        None => (
            NO_PATH.to_string(),
            NO_PATH.to_string(),
            NO_PATH.to_string(),
            NO_PATH.to_string(),
        ),
    }
}

/// Render a node sequence as `A -> B -> C`.
pub fn render_path(path: &[String]) -> String {
    path.join(" -> ")
}

/// Render simple-path alternatives joined with `; `.
pub fn render_simple_paths(paths: &[Vec<String>]) -> String {
    paths
        .iter()
        .map(|p| render_path(p))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Write the service-path table.
///
/// # Returns
/// The number of rows written.
pub fn write_service_paths(records: &[ServicePathRecord], path: impl AsRef<Path>) -> Result<usize> {
    let rows: Vec<ServicePathRow> = records.iter().map(ServicePathRow::from_record).collect();
    write_rows(&rows, path.as_ref())
}

/// Write the node-characterization table.
///
/// # Returns
/// The number of rows written.
pub fn write_characterization(
    records: &[CharacterizationRecord],
    path: impl AsRef<Path>,
) -> Result<usize> {
    write_rows(records, path.as_ref())
}

fn write_rows<T: Serialize>(rows: &[T], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for (i, row) in rows.iter().enumerate() {
        wtr.serialize(row)
            .with_context(|| format!("serialize CSV row #{}", i + 1))?;
    }
    wtr.flush()?;
    Ok(rows.len())
}
