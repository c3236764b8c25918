use std::path::Path;

use anyhow::Result;
use tailmap_core::annotations::generate_annotations;

use crate::{read_input, strip_prefix};

/// Annotation records generated from one C source file.
pub fn render_annotations(source: &Path, strip: Option<&str>) -> Result<String> {
    let text = read_input(source)?;
    let file_name = strip_prefix(&source.display().to_string(), strip);
    let mut out = String::new();
    for annotation in generate_annotations(&file_name, &text) {
        out.push_str(&annotation.to_string());
        out.push('\n');
    }
    Ok(out)
}

pub fn gen_annotations_command(source: &Path, strip: Option<&str>) -> Result<()> {
    print!("{}", render_annotations(source, strip)?);
    Ok(())
}
