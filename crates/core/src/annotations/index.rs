use std::collections::HashMap;

use super::Annotation;

/// Annotations grouped by file, each group kept sorted by line.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    files: HashMap<String, Vec<Annotation>>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after any existing annotations on the same line.
    pub fn add(&mut self, annotation: Annotation) {
        let list = self.files.entry(annotation.file_name.clone()).or_default();
        let at = list.partition_point(|a| a.line <= annotation.line);
        list.insert(at, annotation);
    }

    pub fn extend<I: IntoIterator<Item = Annotation>>(&mut self, annotations: I) {
        for annotation in annotations {
            self.add(annotation);
        }
    }

    /// Annotations of `file_name` whose line is in `[start, end)`, by line.
    pub fn lookup(&self, file_name: &str, start: u32, end: u32) -> &[Annotation] {
        let Some(list) = self.files.get(file_name) else {
            return &[];
        };
        if start >= end {
            return &[];
        }
        let lo = list.partition_point(|a| a.line < start);
        let hi = list.partition_point(|a| a.line < end);
        &list[lo..hi]
    }

    pub fn len(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.values().all(Vec::is_empty)
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<T: IntoIterator<Item = Annotation>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
