use plantnet::testing::*;
use plantnet::{compute_shortest_paths, indicators};

#[test]
fn nodal_efficiency_is_summed_efficiency_over_n_minus_one() {
    let mut g = sparse_graph(50);
    compute_shortest_paths(&mut g);
    indicators::nodal_efficiency(&mut g);

    let n = g.len();
    for rec in g.records() {
        let sum: f64 = rec.efficiency.iter().map(|(_, e)| e).sum();
        assert_opt_close(rec.original_nodal_eff, sum / (n - 1) as f64, 1e-12);
    }
}

#[test]
fn chain_efficiencies() {
    let mut g = chain_graph();
    compute_shortest_paths(&mut g);
    indicators::nodal_efficiency(&mut g);
    indicators::average_global_efficiency(&mut g);
    indicators::local_efficiency(&mut g);

    // A reaches B, C, D at lengths 1, 2, 3.
    let expected_a = (1.0 + 0.5 + 1.0 / 3.0) / 3.0;
    assert_opt_close(g.node("A").unwrap().original_nodal_eff, expected_a, 1e-12);
    // D reaches nothing.
    assert_opt_close(g.node("D").unwrap().original_nodal_eff, 0.0, 1e-12);

    // Local efficiency of A is the nodal efficiency of its only successor B.
    let nodal_b = g.node("B").unwrap().original_nodal_eff.unwrap();
    assert_opt_close(g.node("A").unwrap().original_local_eff, nodal_b, 1e-12);
    assert_opt_close(g.node("D").unwrap().original_local_eff, 0.0, 1e-12);

    // The global average is broadcast to every node.
    let mean: f64 = g
        .records()
        .map(|r| r.original_nodal_eff.unwrap())
        .sum::<f64>()
        / g.len() as f64;
    for rec in g.records() {
        assert_opt_close(rec.original_avg_global_eff, mean, 1e-12);
    }
}

#[test]
fn betweenness_is_bounded_and_interior_only() {
    let mut g = chain_graph();
    compute_shortest_paths(&mut g);
    indicators::betweenness_centrality(&mut g);

    // 6 multi-node shortest paths; B and C each sit inside 2 of them.
    assert_opt_close(g.node("A").unwrap().betweenness_centrality, 0.0, 1e-12);
    assert_opt_close(g.node("B").unwrap().betweenness_centrality, 2.0 / 6.0, 1e-12);
    assert_opt_close(g.node("C").unwrap().betweenness_centrality, 2.0 / 6.0, 1e-12);
    assert_opt_close(g.node("D").unwrap().betweenness_centrality, 0.0, 1e-12);

    let sum: f64 = g
        .records()
        .map(|r| r.betweenness_centrality.unwrap())
        .sum();
    assert!(sum <= 1.0 + 1e-12);
    for rec in g.records() {
        let bc = rec.betweenness_centrality.unwrap();
        assert!((0.0..=1.0).contains(&bc));
    }
}

#[test]
fn betweenness_with_no_interior_paths_is_zero() {
    let mut g = or_pair_graph();
    compute_shortest_paths(&mut g);
    indicators::betweenness_centrality(&mut g);

    for rec in g.records() {
        assert_opt_close(rec.betweenness_centrality, 0.0, 1e-12);
    }
}

#[test]
fn closeness_matches_incoming_path_formula() {
    let mut g = chain_graph();
    compute_shortest_paths(&mut g);
    indicators::closeness_centrality(&mut g);

    // Two multi-node paths end at C (from A at length 2, from B at length
    // 1): (2 / 3) * (2 / 3).
    assert_opt_close(g.node("C").unwrap().closeness_centrality, 4.0 / 9.0, 1e-12);
    // Nothing ends at A.
    assert_opt_close(g.node("A").unwrap().closeness_centrality, 0.0, 1e-12);
}

#[test]
fn degree_centralities_scale_by_n_minus_one() {
    let mut g = chain_graph();
    indicators::indegree_centrality(&mut g);
    indicators::outdegree_centrality(&mut g);
    indicators::degree_centrality(&mut g);

    let b = g.node("B").unwrap();
    assert_opt_close(b.indegree_centrality, 1.0 / 3.0, 1e-12);
    assert_opt_close(b.outdegree_centrality, 1.0 / 3.0, 1e-12);
    assert_opt_close(b.degree_centrality, 2.0 / 3.0, 1e-12);

    // Sources have no inbound flow, sinks no outbound.
    assert_opt_close(g.node("A").unwrap().indegree_centrality, 0.0, 1e-12);
    assert_opt_close(g.node("D").unwrap().outdegree_centrality, 0.0, 1e-12);

    // In-degree plus out-degree equals the total-degree centrality.
    for rec in g.records() {
        let total = rec.indegree_centrality.unwrap() + rec.outdegree_centrality.unwrap();
        assert_close(rec.degree_centrality.unwrap(), total, 1e-12);
    }
}

#[test]
fn final_indicators_land_on_the_snapshot() {
    let mut live = chain_graph();
    compute_shortest_paths(&mut live);
    indicators::nodal_efficiency(&mut live);
    let mut snapshot = live.clone();

    live.remove_node("B");
    live.remove_node("C");
    live.remove_node("D");
    compute_shortest_paths(&mut live);
    indicators::final_nodal_efficiency(&live, &mut snapshot);
    indicators::final_average_global_efficiency(&live, &mut snapshot);
    indicators::final_local_efficiency(&live, &mut snapshot);

    // Survivor: final values present; alone in the graph, efficiency 0.
    assert_opt_close(snapshot.node("A").unwrap().final_nodal_eff, 0.0, 1e-12);
    assert_opt_close(snapshot.node("A").unwrap().final_local_eff, 0.0, 1e-12);
    // Deleted nodes stay blank except the broadcast global average.
    assert_eq!(snapshot.node("C").unwrap().final_nodal_eff, None);
    assert_eq!(snapshot.node("C").unwrap().final_local_eff, None);
    assert!(snapshot.node("C").unwrap().final_avg_global_eff.is_some());
}
