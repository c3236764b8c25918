pub mod commands;

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tailmap_core::annotations::{parse_annotations, AnnotationSet};
use tailmap_core::config::{load_config, ToolConfig};
use tailmap_core::ignore::IgnoreSet;
use tailmap_core::model::Module;
use tailmap_core::tailcall::TailCallTable;

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open input for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read input for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}

pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read and parse an IR file with the built-in tail-call table.
pub fn parse_input(path: &Path) -> Result<Module> {
    let text = read_input(path)?;
    tailmap_core::parser::parse(&text, &TailCallTable::cilium())
        .with_context(|| format!("Failed to parse IR in {}", path.display()))
}

/// Load the tool config at `path`, or the defaults when none is given.
pub fn load_tool_config(path: Option<&Path>) -> Result<ToolConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ToolConfig::default()),
    }
}

/// Expand `names` (or the config's default list when empty) into a flat set.
pub fn resolve_ignore(names: &[String], config: &ToolConfig) -> Result<IgnoreSet> {
    let names = if names.is_empty() { config.ignore_list() } else { names.to_vec() };
    IgnoreSet::build(&names, &config.alias_table()).context("Failed to expand ignore list")
}

/// Load and merge every annotation file.
pub fn load_annotations(paths: &[PathBuf]) -> Result<AnnotationSet> {
    let mut set = AnnotationSet::new();
    for path in paths {
        let text = read_input(path)?;
        let name = path.display().to_string();
        let annotations = parse_annotations(&name, &text)
            .with_context(|| format!("Failed to load annotations from {}", path.display()))?;
        set.extend(annotations);
    }
    Ok(set)
}

/// Write `contents` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("Failed to write output to {}", path.display())),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}

/// File name recorded for `path`, with `prefix` removed when present.
pub fn strip_prefix(path: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => path.strip_prefix(prefix).unwrap_or(path).to_string(),
        None => path.to_string(),
    }
}
