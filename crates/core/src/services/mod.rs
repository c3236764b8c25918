//! Higher-level operations composed from the parser, closure and graph layers.

pub mod call_graph;

pub use call_graph::{build_call_graph, module_graph, CallGraphParams};
