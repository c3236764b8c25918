use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tailmap_core::model::{FnKind, Linkage, Module, SourceRef};

use crate::parse_input;

/// One row of the function listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub kind: FnKind,
    pub linkage: Linkage,
    pub source: SourceRef,
    pub steps: usize,
}

pub fn summarize(module: &Module) -> Vec<FunctionSummary> {
    module
        .iter()
        .map(|def| FunctionSummary {
            name: def.name.clone(),
            kind: def.kind,
            linkage: def.linkage,
            source: def.source.clone(),
            steps: def.steps.len(),
        })
        .collect()
}

/// List every function defined in the input.
pub fn list_functions_command(input: &Path, json: bool) -> Result<()> {
    let module = parse_input(input)?;
    let rows = summarize(&module);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No functions found.");
        return Ok(());
    }
    println!("Functions ({}):", rows.len());
    for row in rows {
        println!("  - {} [{} {}] {} steps={}", row.name, row.kind.as_str(), row.linkage.as_str(), row.source, row.steps);
    }
    Ok(())
}
