use std::path::Path;

use anyhow::Result;
use tailmap_core::graph::to_dot;
use tailmap_core::services::module_graph;

use super::raw_cg::provenance;
use crate::{parse_input, write_output};

/// Render every function of the input and all calls between them.
pub fn render_full_graph(input: &Path) -> Result<String> {
    let module = parse_input(input)?;
    Ok(format!("{}{}", provenance(input)?, to_dot(&module_graph(&module))))
}

pub fn full_graph_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let dot = render_full_graph(input)?;
    write_output(output, &dot)
}
