use std::path::Path;

use anyhow::Result;

use crate::{load_tool_config, resolve_ignore};

/// Flattened ignore set, one name per entry in sorted order.
pub fn expand_ignore(names: &[String], config: Option<&Path>) -> Result<Vec<String>> {
    let config = load_tool_config(config)?;
    let set = resolve_ignore(names, &config)?;
    Ok(set.iter().map(str::to_string).collect())
}

pub fn expand_ignore_command(names: &[String], config: Option<&Path>) -> Result<()> {
    for name in expand_ignore(names, config)? {
        println!("{name}");
    }
    Ok(())
}
