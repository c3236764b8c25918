use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace, warn};

use crate::annotations::{AnnotationKind, AnnotationSet};
use crate::closure::{closure, ClosureError};
use crate::graph::{AttrMap, Attrs, Cell, Graph, Node};
use crate::ignore::IgnoreSet;
use crate::model::{FnDef, Module, Step, StepKind};
use crate::parser::{INTRINSIC_NAME, TAIL_CALL_HELPER};

/// Port on the index cell of a function's header row; edges land here.
pub const START_PORT: &str = "Start0";
/// Port on the entry-point marker row of the start function.
pub const ENTRY_PORT: &str = "E0";
/// Port on the name cell of a function's header row.
pub const NAME_PORT: &str = "start";

/// Port of the row drawn for step `index`.
pub fn step_port(index: usize) -> String {
    format!("s{index}")
}

const TAIL_CALL_COLOR: &str = "orange";

fn conditional_style() -> AttrMap {
    Attrs::new().align("left").bgcolor("yellow").build()
}

fn entry_point_style() -> AttrMap {
    Attrs::new().align("left").bgcolor("pink").build()
}

fn function_style() -> AttrMap {
    Attrs::new().align("left").bgcolor("green").build()
}

fn note_style() -> AttrMap {
    Attrs::new().align("left").bgcolor("lemonchiffon").build()
}

fn step_style() -> AttrMap {
    Attrs::new().align("left").build()
}

fn tail_call_style() -> AttrMap {
    Attrs::new().align("left").bgcolor(TAIL_CALL_COLOR).build()
}

/// Inputs for [`build_call_graph`].
#[derive(Debug, Clone, Default)]
pub struct CallGraphParams {
    pub start: String,
    pub ignored: IgnoreSet,
    pub annotations: AnnotationSet,
}

impl CallGraphParams {
    pub fn new(start: impl Into<String>) -> Self {
        Self { start: start.into(), ..Self::default() }
    }
}

/// Whether a call step is helper noise that never gets a row or an edge.
fn is_synthetic_call(step: &Step) -> bool {
    step.kind == StepKind::Call && (step.target == INTRINSIC_NAME || step.target == TAIL_CALL_HELPER)
}

/// Build the call graph reachable from `params.start`.
///
/// Every visited function becomes a node listing its steps, with
/// annotations from the function's source file overlaid between them.
/// Edges into ignored functions are neither followed nor drawn, and nodes
/// that end up unreachable through visible nodes are hidden.
pub fn build_call_graph(module: &Module, params: &CallGraphParams) -> Result<Graph, ClosureError> {
    let mut builder = Builder { params, graph: Graph::new("cfg"), visited: Vec::new() };

    closure(
        module,
        &params.start,
        |def| {
            builder.add_function(def);
            true
        },
        |_, step| step.edge_target().is_some_and(|target| params.ignored.contains(target)),
    )?;

    builder.add_edges();
    builder.hide_unreachable();
    debug!(
        start = %params.start,
        nodes = builder.visited.len(),
        edges = builder.graph.edges().count(),
        "built call graph"
    );
    Ok(builder.graph)
}

struct Builder<'p, 'm> {
    params: &'p CallGraphParams,
    graph: Graph,
    visited: Vec<&'m FnDef>,
}

impl<'p, 'm> Builder<'p, 'm> {
    fn add_function(&mut self, def: &'m FnDef) {
        trace!(function = %def.name, source = %def.source, "visit");
        self.visited.push(def);

        let params = self.params;
        let node = self.graph.add_node(&def.name);
        node.set_attr("shape", "rectangle");
        node.hidden = params.ignored.contains(&def.name);

        if def.name == params.start {
            node.add_row(vec![
                Cell::text("-").with_port(ENTRY_PORT),
                Cell::empty(),
                Cell::text("ENTRYPOINT").with_attrs(entry_point_style()),
            ]);
        }
        node.add_row(vec![
            Cell::text("0").with_port(START_PORT),
            Cell::text(def.source.to_string()),
            Cell::text(format!("{}()", def.name)).with_port(NAME_PORT).with_attrs(function_style()),
        ]);

        let mut prev_line = def.source.line;
        for (i, step) in def.steps.iter().enumerate() {
            // Annotation lookup assumes the whole function lives in one file.
            if step.source.file != def.source.file {
                warn!(
                    function = %def.name,
                    step = %step.source,
                    "source file mismatch inside function"
                );
            }
            add_annotations(node, &params.annotations, &def.source.file, prev_line, step.source.line);
            prev_line = step.source.line;

            let index = Cell::text(i.to_string());
            let location = Cell::text(step.source.to_string());
            match step.kind {
                StepKind::Call if is_synthetic_call(step) => {}
                StepKind::Call if step.target.is_empty() => {
                    warn!(function = %def.name, step = i, "call step without a target skipped");
                }
                StepKind::Call => {
                    node.add_row(vec![
                        index,
                        location,
                        Cell::text(&step.target).with_port(step_port(i)).with_attrs(step_style()),
                    ]);
                }
                StepKind::TailCall => {
                    let text = if step.target.is_empty() { "?" } else { step.target.as_str() };
                    node.add_row(vec![
                        index,
                        location,
                        Cell::text(text).with_port(step_port(i)).with_attrs(tail_call_style()),
                    ]);
                }
                StepKind::Return => {
                    node.add_row(vec![index, location, Cell::text("ret").with_attrs(step_style())]);
                }
            }
        }
    }

    fn add_edges(&mut self) {
        let drawn: HashSet<&str> = self.visited.iter().map(|def| def.name.as_str()).collect();
        for def in &self.visited {
            for (i, step) in def.steps.iter().enumerate() {
                if is_synthetic_call(step) {
                    continue;
                }
                let Some(target) = step.edge_target() else {
                    continue;
                };
                if self.params.ignored.contains(target) || !drawn.contains(target) {
                    continue;
                }
                let port = step_port(i);
                let edge = self.graph.add_edge(&def.name, Some(&port), target, Some(START_PORT));
                if step.kind == StepKind::TailCall {
                    edge.set_attr("color", TAIL_CALL_COLOR);
                }
            }
        }
    }

    fn hide_unreachable(&mut self) {
        let mut visible = BTreeSet::new();
        let graph = &self.graph;
        graph.traverse(
            &self.params.start,
            |node| {
                if node.hidden {
                    return false;
                }
                visible.insert(node.name.clone());
                true
            },
            |edge| graph.node(&edge.to).is_some_and(|n| !n.hidden),
        );
        for node in self.graph.nodes_mut() {
            if !visible.contains(&node.name) {
                node.hidden = true;
            }
        }
    }
}

fn add_annotations(node: &mut Node, annotations: &AnnotationSet, file: &str, start: u32, end: u32) {
    for an in annotations.lookup(file, start, end) {
        for (k, v) in &an.tags {
            node.tags.insert(k.clone(), v.clone());
        }
        let style = match an.kind {
            AnnotationKind::Conditional => conditional_style(),
            AnnotationKind::Note => note_style(),
        };
        node.add_row(vec![
            Cell::empty(),
            Cell::text(format!("{}:{}", an.file_name, an.line)),
            Cell::text(&an.text).with_attrs(style),
        ]);
    }
}

/// Graph of every function in `module` and every call between defined
/// functions.
pub fn module_graph(module: &Module) -> Graph {
    let mut graph = Graph::new("module");
    for def in module.iter() {
        let node = graph.add_node(&def.name);
        node.set_attr("shape", "rectangle");
        node.add_row(vec![
            Cell::text("0").with_port(START_PORT),
            Cell::text(def.source.to_string()),
            Cell::text(format!("{}()", def.name)).with_attrs(function_style()),
        ]);
        for (i, step) in def.steps.iter().enumerate() {
            let (text, style) = match step.kind {
                StepKind::Call => (step.target.as_str(), step_style()),
                StepKind::TailCall => (step.target.as_str(), tail_call_style()),
                StepKind::Return => ("ret", step_style()),
            };
            node.add_row(vec![
                Cell::text(i.to_string()),
                Cell::text(step.source.to_string()),
                Cell::text(text).with_port(step_port(i)).with_attrs(style),
            ]);
        }
    }
    for def in module.iter() {
        for (i, step) in def.steps.iter().enumerate() {
            let Some(target) = step.edge_target().filter(|t| module.contains(t)) else {
                continue;
            };
            let port = step_port(i);
            let edge = graph.add_edge(&def.name, Some(&port), target, Some(START_PORT));
            if step.kind == StepKind::TailCall {
                edge.set_attr("color", TAIL_CALL_COLOR);
            }
        }
    }
    graph
}
