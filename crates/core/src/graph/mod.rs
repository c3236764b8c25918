//! Labelled directed graph handed to the renderer.
//!
//! Nodes carry rows of cells (a table label); cells may expose a named port
//! that edges attach to. Nodes and edges can be marked hidden: the renderer
//! leaves them out but keeps every visible row in place.

mod dot;

use std::collections::{BTreeMap, HashSet, VecDeque};

pub use dot::to_dot;

pub type AttrMap = BTreeMap<String, String>;

/// Builder for attribute maps.
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    map: AttrMap,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map.insert(key.into(), value.into());
        self
    }

    pub fn align(self, value: &str) -> Self {
        self.add("align", value)
    }

    pub fn bgcolor(self, value: &str) -> Self {
        self.add("bgcolor", value)
    }

    pub fn build(self) -> AttrMap {
        self.map
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub port: Option<String>,
    pub attrs: AttrMap,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn with_attrs(mut self, attrs: AttrMap) -> Self {
        self.attrs = attrs;
        self
    }
}

pub type Row = Vec<Cell>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub rows: Vec<Row>,
    pub attrs: AttrMap,
    pub tags: BTreeMap<String, Option<String>>,
    pub hidden: bool,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn add_row(&mut self, row: Row) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Whether any cell exposes `port`.
    pub fn has_port(&self, port: &str) -> bool {
        self.rows.iter().flatten().any(|c| c.port.as_deref() == Some(port))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub from_port: Option<String>,
    pub to: String,
    pub to_port: Option<String>,
    pub attrs: AttrMap,
    pub hidden: bool,
}

impl Edge {
    /// Identity used to collapse duplicate edges.
    pub fn key(&self) -> String {
        format!(
            "{}:{}->{}:{}",
            self.from,
            self.from_port.as_deref().unwrap_or(""),
            self.to,
            self.to_port.as_deref().unwrap_or("")
        )
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub name: String,
    pub tags: BTreeMap<String, String>,
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<String, Edge>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Get the node called `name`, creating it if needed.
    pub fn add_node(&mut self, name: &str) -> &mut Node {
        self.nodes.entry(name.to_string()).or_insert_with(|| Node::new(name))
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Add an edge; an identical edge (same endpoints and ports) is reused.
    pub fn add_edge(
        &mut self,
        from: &str,
        from_port: Option<&str>,
        to: &str,
        to_port: Option<&str>,
    ) -> &mut Edge {
        let edge = Edge {
            from: from.to_string(),
            from_port: from_port.map(str::to_string),
            to: to.to_string(),
            to_port: to_port.map(str::to_string),
            ..Edge::default()
        };
        self.edges.entry(edge.key()).or_insert(edge)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edges_from<'g>(&'g self, name: &'g str) -> impl Iterator<Item = &'g Edge> + 'g {
        self.edges.values().filter(move |e| e.from == name)
    }

    /// Breadth-first walk from `start` along outgoing edges.
    ///
    /// A node for which `on_node` returns `false` is not expanded; an edge
    /// for which `on_edge` returns `false` is not followed.
    pub fn traverse<N, E>(&self, start: &str, mut on_node: N, mut on_edge: E)
    where
        N: FnMut(&Node) -> bool,
        E: FnMut(&Edge) -> bool,
    {
        let Some(root) = self.nodes.get(start) else {
            return;
        };
        let mut queue = VecDeque::from([root]);
        let mut seen: HashSet<&str> = HashSet::from([root.name.as_str()]);
        while let Some(node) = queue.pop_front() {
            if !on_node(node) {
                continue;
            }
            for edge in self.edges_from(&node.name) {
                if !on_edge(edge) {
                    continue;
                }
                if let Some(next) = self.nodes.get(&edge.to) {
                    if seen.insert(next.name.as_str()) {
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    /// Whether an edge should be drawn: not hidden itself and both ends
    /// present and visible.
    pub fn edge_visible(&self, edge: &Edge) -> bool {
        let visible = |name: &str| self.nodes.get(name).is_some_and(|n| !n.hidden);
        !edge.hidden && visible(&edge.from) && visible(&edge.to)
    }
}
