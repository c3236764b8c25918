//! tailmap-core
//!
//! Core library for reconstructing the call graph of eBPF datapath programs
//! from textual LLVM IR, including the static tail calls that jump between
//! programs through a program array.
//!
//! The pipeline is:
//! - `parser`: recognise function boundaries, calls, tail-call dispatch and
//!   debug metadata, producing a [`model::Module`] with source locations
//!   resolved through `debuginfo`.
//! - `closure`: breadth-first reachability from a start function.
//! - `ignore` and `annotations`: inputs that prune and decorate the graph.
//! - `services::call_graph`: assemble a [`graph::Graph`] ready for DOT output.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! the CLI frontend.

pub mod annotations;
pub mod closure;
pub mod config;
pub mod debuginfo;
pub mod graph;
pub mod ignore;
pub mod model;
pub mod parser;
pub mod services;
pub mod tailcall;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
