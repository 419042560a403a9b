//! Command-line entry point: load a plant topology, dump the Gephi check
//! files and run the element-perturbation scenario.

use anyhow::{Context, Result, bail};
use plantnet::PlantNetwork;
use plantnet::io::{loader, report};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let log_file = File::create("plantnet.log").context("create plantnet.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("usage: plantnet <topology.csv>");
    };

    let graph = loader::load_graph(&input).with_context(|| format!("load {input}"))?;
    loader::check_input_with_gephi(&graph, Path::new("."))?;

    let mut network = PlantNetwork::new(graph);
    if let Some(rep) = network.delete_element("1") {
        let rows = report::write_characterization(&rep.characterization, "element_perturbation.csv")?;
        info!(rows, file = "element_perturbation.csv", "characterization written");
        let rows = report::write_service_paths(
            &rep.service_paths,
            "service_paths_element_perturbation.csv",
        )?;
        info!(
            rows,
            file = "service_paths_element_perturbation.csv",
            "service paths written"
        );
    }
    Ok(())
}
