use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tailmap_core::graph::to_dot;
use tailmap_core::services::{build_call_graph, CallGraphParams};
use tracing::info;

use crate::{load_annotations, load_tool_config, parse_input, resolve_ignore, sha256_file, write_output};

/// Options for the `raw-cg` command.
#[derive(Debug, Clone, Default)]
pub struct RawCgOptions {
    pub input: PathBuf,
    pub start: String,
    pub ignore: Vec<String>,
    pub annotations: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Build the call graph reachable from a start function and render it as DOT.
pub fn render_raw_cg(opts: &RawCgOptions) -> Result<String> {
    let config = load_tool_config(opts.config.as_deref())?;
    let ignored = resolve_ignore(&opts.ignore, &config)?;
    let annotations = load_annotations(&opts.annotations)?;
    let module = parse_input(&opts.input)?;
    info!(functions = module.len(), ignored = ignored.len(), annotations = annotations.len(), "inputs loaded");

    let params = CallGraphParams { start: opts.start.clone(), ignored, annotations };
    let graph = build_call_graph(&module, &params)
        .with_context(|| format!("Failed to build call graph from {}", opts.input.display()))?;

    Ok(format!("{}{}", provenance(&opts.input)?, to_dot(&graph)))
}

pub fn raw_cg_command(opts: &RawCgOptions) -> Result<()> {
    let dot = render_raw_cg(opts)?;
    write_output(opts.output.as_deref(), &dot)
}

/// DOT comment naming the input and its digest.
pub(crate) fn provenance(input: &Path) -> Result<String> {
    Ok(format!("// input: {} sha256: {}\n", input.display(), sha256_file(input)?))
}
