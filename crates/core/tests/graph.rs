use tailmap_core::graph::{to_dot, Attrs, Cell, Graph};

fn diamond() -> Graph {
    let mut graph = Graph::new("g");
    for name in ["a", "b", "c", "d"] {
        graph.add_node(name).add_row(vec![Cell::text(name).with_port("in")]);
    }
    graph.add_edge("a", None, "b", Some("in"));
    graph.add_edge("a", None, "c", Some("in"));
    graph.add_edge("b", None, "d", Some("in"));
    graph.add_edge("c", None, "d", Some("in"));
    graph
}

#[test]
fn duplicate_edges_collapse() {
    let mut graph = diamond();
    graph.add_edge("a", None, "b", Some("in")).set_attr("color", "orange");
    assert_eq!(graph.edges().count(), 4);
    let edge = graph.edges_from("a").find(|e| e.to == "b").expect("a -> b");
    assert_eq!(edge.attrs.get("color").map(String::as_str), Some("orange"));
}

#[test]
fn edges_are_directed() {
    let mut graph = diamond();
    graph.add_edge("b", None, "a", Some("in"));
    assert_eq!(graph.edges().count(), 5);
}

#[test]
fn traverse_visits_reachable_nodes_once() {
    let graph = diamond();
    let mut order = Vec::new();
    graph.traverse(
        "a",
        |node| {
            order.push(node.name.clone());
            true
        },
        |_| true,
    );
    assert_eq!(order, vec!["a", "b", "c", "d"]);
}

#[test]
fn traverse_respects_node_and_edge_filters() {
    let graph = diamond();
    let mut order = Vec::new();
    graph.traverse(
        "a",
        |node| {
            order.push(node.name.clone());
            node.name != "b"
        },
        |edge| edge.to != "c",
    );
    assert_eq!(order, vec!["a", "b"]);
}

#[test]
fn dot_output_has_table_labels_and_ported_edges() {
    let mut graph = Graph::new("g");
    let node = graph.add_node("f");
    node.set_attr("shape", "rectangle");
    node.add_row(vec![
        Cell::text("0").with_port("Start0"),
        Cell::text("a<b> & \"c\"").with_attrs(Attrs::new().align("left").bgcolor("green").build()),
    ]);
    graph.add_node("g");
    graph.add_edge("f", Some("s0"), "g", Some("Start0")).set_attr("color", "orange");

    let dot = to_dot(&graph);
    assert!(dot.starts_with("digraph {\nrankdir=\"LR\"\n"), "{dot}");
    assert!(dot.trim_end().ends_with('}'));
    assert!(
        dot.contains("<td port=\"Start0\">0</td><td align=\"left\" bgcolor=\"green\">a&lt;b&gt; &amp; &quot;c&quot;</td>"),
        "{dot}"
    );
    assert!(dot.contains("shape=\"rectangle\""), "{dot}");
    assert!(dot.contains("\"g\" [label=\"g\"];"), "{dot}");
    assert!(dot.contains("\"f\":\"s0\" -> \"g\":\"Start0\" [color=\"orange\"];"), "{dot}");
}

#[test]
fn hidden_nodes_drop_their_edges() {
    let mut graph = diamond();
    graph.node_mut("b").expect("b").hidden = true;
    let dot = to_dot(&graph);
    assert!(!dot.contains("\"b\" ["), "{dot}");
    assert!(!dot.contains("-> \"b\""), "{dot}");
    assert!(!dot.contains("\"b\" ->"), "{dot}");
    assert!(dot.contains("\"c\" -> \"d\":\"in\""), "{dot}");
    // Visible rows stay in place.
    assert!(dot.contains("<td port=\"in\">d</td>"), "{dot}");
}

#[test]
fn nodes_expose_ports() {
    let graph = diamond();
    let node = graph.node("a").expect("a");
    assert!(node.has_port("in"));
    assert!(!node.has_port("out"));
}
