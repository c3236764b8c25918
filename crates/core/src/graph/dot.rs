use std::fmt::Write as _;

use super::{AttrMap, Cell, Edge, Graph, Node};

/// Render `graph` in Graphviz DOT syntax, leaving out hidden elements.
pub fn to_dot(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("digraph {\n");
    out.push_str("rankdir=\"LR\"\n");
    for node in graph.nodes().filter(|n| !n.hidden) {
        render_node(&mut out, node);
    }
    for edge in graph.edges().filter(|e| graph.edge_visible(e)) {
        render_edge(&mut out, edge);
    }
    out.push_str("}\n");
    out
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn attr_list(attrs: &AttrMap) -> Vec<String> {
    attrs.iter().map(|(k, v)| format!("{k}={}", quote(v))).collect()
}

fn render_cell(out: &mut String, cell: &Cell) {
    let mut attrs = Vec::new();
    if let Some(port) = &cell.port {
        attrs.push(format!("port=\"{}\"", escape_html(port)));
    }
    attrs.extend(cell.attrs.iter().map(|(k, v)| format!("{k}=\"{}\"", escape_html(v))));
    if attrs.is_empty() {
        let _ = write!(out, "<td>{}</td>", escape_html(&cell.text));
    } else {
        let _ = write!(out, "<td {}>{}</td>", attrs.join(" "), escape_html(&cell.text));
    }
}

fn render_node(out: &mut String, node: &Node) {
    let mut attrs = attr_list(&node.attrs);
    if node.rows.is_empty() {
        attrs.insert(0, format!("label={}", quote(&node.name)));
        let _ = writeln!(out, "  {} [{}];", quote(&node.name), attrs.join(" "));
        return;
    }

    let mut label = String::from("<<table border=\"0\">");
    for row in &node.rows {
        label.push_str("<tr>");
        for cell in row {
            render_cell(&mut label, cell);
        }
        label.push_str("</tr>");
    }
    label.push_str("</table>>");
    attrs.push(format!("label={label}"));
    let _ = writeln!(out, "  {} [{}];", quote(&node.name), attrs.join(" "));
}

fn endpoint(name: &str, port: Option<&str>) -> String {
    match port {
        Some(port) => format!("{}:{}", quote(name), quote(port)),
        None => quote(name),
    }
}

fn render_edge(out: &mut String, edge: &Edge) {
    let _ = write!(
        out,
        "  {} -> {}",
        endpoint(&edge.from, edge.from_port.as_deref()),
        endpoint(&edge.to, edge.to_port.as_deref())
    );
    if !edge.attrs.is_empty() {
        let _ = write!(out, " [{}]", attr_list(&edge.attrs).join(","));
    }
    out.push_str(";\n");
}
