//! Optional YAML tool configuration.
//!
//! ```yaml
//! aliases:
//!   "@mine": [helper_a, helper_b]
//!   "@default": ["@mine", "@builtins"]
//! default_ignore: ["@mine"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ignore::{AliasTable, DEFAULT_ALIAS};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Alias groups layered over the built-in table; an entry replaces the
    /// built-in group of the same name.
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Ignore list used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ignore: Option<Vec<String>>,
}

impl ToolConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse tool config YAML")
    }

    /// Built-in aliases with this config's groups merged on top.
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::builtin();
        for (alias, members) in &self.aliases {
            table.insert(alias.clone(), members.iter().cloned());
        }
        table
    }

    /// Ignore list to expand when the caller gives none.
    pub fn ignore_list(&self) -> Vec<String> {
        self.default_ignore.clone().unwrap_or_else(|| vec![DEFAULT_ALIAS.to_string()])
    }
}

/// Read and parse a YAML tool config from disk.
pub fn load_config(path: &Path) -> Result<ToolConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tool config at {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse tool config at {}", path.display()))
}
