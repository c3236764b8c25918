use std::sync::OnceLock;

use regex::Regex;

use super::{Annotation, AnnotationKind};

fn conditional_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*#\s*(?:ifdef|ifndef|if|elif|else|endif)\b.*$")
            .expect("invalid conditional pattern")
    })
}

fn note_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//\s*!note:(.*)$").expect("invalid note pattern"))
}

/// Make free text safe for a single annotation record.
pub fn sanitize(text: &str) -> String {
    text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect::<String>().trim().to_string()
}

/// Scan C source for preprocessor conditionals and `// !note:` comments.
pub fn generate_annotations(file_name: &str, source: &str) -> Vec<Annotation> {
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        if conditional_pattern().is_match(line) {
            out.push(Annotation::new(file_name, line_no, AnnotationKind::Conditional, sanitize(line)));
        } else if let Some(caps) = note_pattern().captures(line) {
            out.push(Annotation::new(file_name, line_no, AnnotationKind::Note, sanitize(&caps[1])));
        }
    }
    out
}
