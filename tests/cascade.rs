use plantnet::cascade::{CascadeState, propagate};
use plantnet::element::{DependencyKind, Description, ElementKind};
use plantnet::testing::*;

#[test]
fn single_chain_breaks_everything_downstream() {
    let g = chain_graph();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "B");

    let broken = state.broken_set();
    assert!(broken.contains("B"));
    assert!(broken.contains("C"));
    assert!(broken.contains("D"));
    assert!(!broken.contains("A"));
}

#[test]
fn or_element_survives_with_an_intact_predecessor() {
    let g = or_pair_graph();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "A");

    let broken = state.broken_set();
    assert_eq!(broken.len(), 1);
    assert!(broken.contains("A"));
}

#[test]
fn or_element_breaks_when_the_last_predecessor_goes() {
    let g = or_pair_graph();
    let mut state = CascadeState::new();
    // Area-style double failure against one shared state.
    propagate(&g, &mut state, "A");
    propagate(&g, &mut state, "B");

    let broken = state.broken_set();
    assert!(broken.contains("A"));
    assert!(broken.contains("B"));
    assert!(broken.contains("C"));
}

#[test]
fn and_element_collapses_with_one_lost_predecessor() {
    let g = and_pair_graph();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "A");

    let broken = state.broken_set();
    assert!(broken.contains("A"));
    assert!(broken.contains("C"));
    assert!(!broken.contains("B"));
}

#[test]
fn open_valve_stops_the_cascade_and_records_the_transition() {
    let g = valve_line_graph();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "S");

    let broken = state.broken_set();
    assert_eq!(broken.len(), 1);
    assert!(broken.contains("S"));
    // The valve flipped to "0" but is neither broken nor descended through.
    assert_eq!(state.intermediate_status.get("V"), Some(&false));
    assert!(!broken.contains("V"));
    assert!(!broken.contains("U"));
}

#[test]
fn already_closed_valve_keeps_its_status() {
    let g = GraphBuilder::new()
        .node("S", ElementKind::Source)
        .valve("V", Description::IsolationB, false)
        .node("U", ElementKind::User)
        .edge("S", "V", DependencyKind::Single, 1.0)
        .edge("V", "U", DependencyKind::Single, 1.0)
        .build();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "S");

    assert!(state.intermediate_status.is_empty());
    assert!(!state.broken_set().contains("U"));
}

#[test]
fn valve_at_the_origin_breaks_and_propagates() {
    let g = valve_line_graph();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "V");

    let broken = state.broken_set();
    assert!(broken.contains("V"));
    assert!(broken.contains("U"));
    assert!(!broken.contains("S"));
    assert_eq!(state.intermediate_status.get("V"), Some(&false));
}

#[test]
fn orphan_root_breaks_like_single() {
    let g = chain_graph();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "A");

    // A has no predecessors and is treated as SINGLE.
    assert_eq!(state.broken_set().len(), 4);
}

#[test]
fn or_diamond_child_is_examined_once() {
    // Diamond: A feeds B and C, both feed D (OR). Each node is visited at
    // most once, so D is judged the first time the cascade reaches it --
    // while one of its predecessors still looks intact -- and survives the
    // single propagation.
    let g = GraphBuilder::new()
        .node("A", ElementKind::Source)
        .node("B", ElementKind::Hub)
        .node("C", ElementKind::Hub)
        .node("D", ElementKind::User)
        .edge("A", "B", DependencyKind::Single, 1.0)
        .edge("A", "C", DependencyKind::Single, 1.0)
        .edge("B", "D", DependencyKind::Or, 1.0)
        .edge("C", "D", DependencyKind::Or, 1.0)
        .build();
    let mut state = CascadeState::new();
    propagate(&g, &mut state, "A");

    let broken = state.broken_set();
    assert!(!broken.contains("D"));
    assert_eq!(broken.len(), 3);
}
