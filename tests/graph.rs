use plantnet::element::{DependencyKind, ElementKind};
use plantnet::graph::{DependencyEdge, PlantGraph};
use plantnet::testing::*;

#[test]
fn removing_a_node_drops_incident_edges() {
    let mut g = chain_graph();
    assert_eq!(g.edge_count(), 3);

    g.remove_node("B");

    assert!(!g.contains("B"));
    assert_eq!(g.edge_count(), 1);
    assert!(g.edge("A", "B").is_none());
    assert!(g.edge("B", "C").is_none());
    assert!(g.edge("C", "D").is_some());
    assert_eq!(g.successors("A").count(), 0);
    assert_eq!(g.predecessors("C").count(), 0);
}

#[test]
fn insertion_order_is_preserved() {
    let g = chain_graph();
    let marks: Vec<&str> = g.marks().collect();
    assert_eq!(marks, ["A", "B", "C", "D"]);
}

#[test]
fn weighted_degrees_sum_edge_weights() {
    let g = GraphBuilder::new()
        .node("A", ElementKind::Source)
        .node("B", ElementKind::Hub)
        .node("C", ElementKind::User)
        .edge("A", "B", DependencyKind::Single, 2.5)
        .edge("B", "C", DependencyKind::Single, 1.5)
        .build();

    assert_close(g.in_degree_weighted("B"), 2.5, 1e-12);
    assert_close(g.out_degree_weighted("B"), 1.5, 1e-12);
    assert_close(g.degree_weighted("B"), 4.0, 1e-12);
    assert_close(g.in_degree_weighted("A"), 0.0, 1e-12);
}

#[test]
fn has_path_follows_edge_direction() {
    let g = chain_graph();
    assert!(g.has_path("A", "D"));
    assert!(g.has_path("B", "D"));
    assert!(!g.has_path("D", "A"));
    assert!(!g.has_path("A", "nope"));
}

#[test]
fn all_simple_paths_enumerates_alternatives() {
    // A -> B -> D and A -> C -> D.
    let g = GraphBuilder::new()
        .node("A", ElementKind::Source)
        .node("B", ElementKind::Hub)
        .node("C", ElementKind::Hub)
        .node("D", ElementKind::User)
        .edge("A", "B", DependencyKind::Or, 1.0)
        .edge("A", "C", DependencyKind::Or, 1.0)
        .edge("B", "D", DependencyKind::Or, 1.0)
        .edge("C", "D", DependencyKind::Or, 1.0)
        .build();

    let mut paths = g.all_simple_paths("A", "D");
    paths.sort();
    assert_eq!(
        paths,
        vec![
            vec!["A".to_string(), "B".to_string(), "D".to_string()],
            vec!["A".to_string(), "C".to_string(), "D".to_string()],
        ]
    );
    assert!(g.all_simple_paths("D", "A").is_empty());
}

#[test]
fn clone_is_a_deep_copy() {
    let g = chain_graph();
    let mut copy = g.clone();
    copy.remove_node("B");
    copy.node_mut("A").unwrap().area = "elsewhere".to_string();

    assert!(g.contains("B"));
    assert_eq!(g.node("A").unwrap().area, "area1");
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn serialize_and_reload_reproduces_every_attribute() -> anyhow::Result<()> {
    let mut g = chain_graph();
    // Give the store some computed state so the round-trip covers it.
    plantnet::compute_shortest_paths(&mut g);
    plantnet::indicators::nodal_efficiency(&mut g);

    let json = serde_json::to_string(&g)?;
    let reloaded: PlantGraph = serde_json::from_str(&json)?;

    assert_eq!(reloaded.len(), g.len());
    assert_eq!(reloaded.edge_count(), g.edge_count());
    let original: Vec<_> = g.records().collect();
    let restored: Vec<_> = reloaded.records().collect();
    assert_eq!(original, restored);
    for (from, to, edge) in g.edges() {
        assert_eq!(reloaded.edge(from, to), Some(edge));
    }
    Ok(())
}

#[test]
fn reinserting_a_mark_keeps_edges() {
    let mut g = chain_graph();
    let mut replacement = g.node("B").unwrap().clone();
    replacement.area = "area9".to_string();
    g.add_node(replacement);

    assert_eq!(g.node("B").unwrap().area, "area9");
    assert!(g.edge("A", "B").is_some());
    assert!(g.edge("B", "C").is_some());
    assert_eq!(g.marks().count(), 4);
}

#[test]
fn density_counts_ordered_pairs() {
    let g = chain_graph();
    // 3 edges over 4 * 3 ordered pairs.
    assert_close(g.density(), 3.0 / 12.0, 1e-12);
    assert_close(PlantGraph::new().density(), 0.0, 1e-12);
}

#[test]
fn edge_attributes_are_readable() {
    let g = chain_graph();
    let e: &DependencyEdge = g.edge("A", "B").unwrap();
    assert_eq!(e.kind, DependencyKind::Single);
    assert_close(e.weight, 1.0, 1e-12);
}
