use plantnet::element::{DependencyKind, Description, ElementKind};
use plantnet::io::loader;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str =
    "Mark,Father_mark,Father_cond,Description,InitStatus,Area,PerturbationResistant,Type,Service";

fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("plant.csv");
    fs::write(&path, format!("{HEADER}\n{body}\n")).unwrap();
    path
}

#[test]
fn loads_nodes_edges_and_attributes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        "A,NULL,ORPHAN,generator,1,area1,1,SOURCE,0\n\
         V,A,SINGLE,isolation_A,0,area1,0,HUB,2.5\n\
         U,V,SINGLE,load,1,area2,0,USER,2.5",
    );

    let g = loader::load_graph(&path)?;

    assert_eq!(g.len(), 3);
    assert_eq!(g.edge_count(), 2);

    let a = g.node("A").unwrap();
    assert_eq!(a.kind, ElementKind::Source);
    assert!(a.init_status);
    assert!(a.perturbation_resistant);
    assert_eq!(a.area, "area1");
    assert_eq!(a.description, Description::Other("generator".to_string()));

    let v = g.node("V").unwrap();
    assert_eq!(v.description, Description::IsolationA);
    assert!(!v.init_status);

    let e = g.edge("A", "V").unwrap();
    assert_eq!(e.kind, DependencyKind::Single);
    assert_eq!(e.weight, 2.5);
    Ok(())
}

#[test]
fn null_father_declares_a_root_without_an_edge() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(&dir, "A,NULL,ORPHAN,generator,1,area1,0,SOURCE,0");

    let g = loader::load_graph(&path)?;

    assert_eq!(g.len(), 1);
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.predecessors("A").count(), 0);
    Ok(())
}

#[test]
fn repeated_mark_updates_the_same_node() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        "A,NULL,ORPHAN,generator,1,area1,0,SOURCE,0\n\
         B,NULL,ORPHAN,generator,1,area1,0,SOURCE,0\n\
         C,A,AND,joint,1,area1,0,USER,1.0\n\
         C,B,AND,joint load,1,area2,0,USER,2.0",
    );

    let g = loader::load_graph(&path)?;

    assert_eq!(g.len(), 3);
    assert_eq!(g.edge_count(), 2);
    let c = g.node("C").unwrap();
    // The later row wins the node attributes.
    assert_eq!(c.area, "area2");
    assert_eq!(c.description, Description::Other("joint load".to_string()));
    assert_eq!(g.edge("A", "C").unwrap().weight, 1.0);
    assert_eq!(g.edge("B", "C").unwrap().weight, 2.0);
    Ok(())
}

#[test]
fn forward_referenced_father_is_filled_in_later() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        "B,A,SINGLE,cable,1,area1,0,USER,1.0\n\
         A,NULL,ORPHAN,generator,1,area1,0,SOURCE,0",
    );

    let g = loader::load_graph(&path)?;

    let a = g.node("A").unwrap();
    assert_eq!(a.kind, ElementKind::Source);
    assert_eq!(a.area, "area1");
    assert!(g.edge("A", "B").is_some());
    Ok(())
}

#[test]
fn rejects_unknown_father_cond() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "A,NULL,ORPHAN,generator,1,area1,0,SOURCE,0\n\
         B,A,MAYBE,cable,1,area1,0,USER,1.0",
    );

    let err = loader::load_graph(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Father_cond"), "got: {err:#}");
}

#[test]
fn rejects_non_numeric_service() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "A,NULL,ORPHAN,generator,1,area1,0,SOURCE,0\n\
         B,A,SINGLE,cable,1,area1,0,USER,lots",
    );

    let err = loader::load_graph(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Service"), "got: {err:#}");
}

#[test]
fn rejects_bad_status_and_unknown_type() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "A,NULL,ORPHAN,generator,2,area1,0,SOURCE,0");
    let err = loader::load_graph(&path).unwrap_err();
    assert!(format!("{err:#}").contains("InitStatus"), "got: {err:#}");

    let path = write_csv(&dir, "A,NULL,ORPHAN,generator,1,area1,0,SINK,0");
    let err = loader::load_graph(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Type"), "got: {err:#}");
}

#[test]
fn rejects_missing_field() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plant.csv");
    // No Service column at all.
    fs::write(
        &path,
        "Mark,Father_mark,Father_cond,Description,InitStatus,Area,PerturbationResistant,Type\n\
         A,NULL,ORPHAN,generator,1,area1,0,SOURCE\n",
    )
    .unwrap();

    assert!(loader::load_graph(&path).is_err());
}

#[test]
fn rejects_mixed_or_and_non_or_conditions() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "A,NULL,ORPHAN,generator,1,area1,0,SOURCE,0\n\
         B,NULL,ORPHAN,generator,1,area1,0,SOURCE,0\n\
         C,A,AND,joint,1,area1,0,USER,1.0\n\
         C,B,OR,joint,1,area1,0,USER,1.0",
    );

    let err = loader::load_graph(&path).unwrap_err();
    assert!(format!("{err:#}").contains("mixes OR"), "got: {err:#}");
}

#[test]
fn gephi_check_dumps_nodes_and_edges() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_csv(
        &dir,
        "A,NULL,ORPHAN,generator,1,area1,0,SOURCE,0\n\
         B,A,SINGLE,cable,1,area1,0,USER,1.0",
    );
    let g = loader::load_graph(&path)?;

    loader::check_input_with_gephi(&g, dir.path())?;

    let nodes = fs::read_to_string(dir.path().join("check_import_nodes.csv"))?;
    assert!(nodes.starts_with("Mark,Description,InitStatus,PerturbationResistant,Area"));
    assert!(nodes.contains("A,generator,1,0,area1"));
    assert!(nodes.contains("B,cable,1,0,area1"));

    let edges = fs::read_to_string(dir.path().join("check_import_edges.csv"))?;
    assert!(edges.starts_with("Mark,Father_mark"));
    assert!(edges.contains("B,A"));
    Ok(())
}
