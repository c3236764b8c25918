//! Core data model for a parsed IR module.
//!
//! A [`Module`] owns every defined function ([`FnDef`]) keyed by name. Each
//! function carries the ordered [`Step`]s the parser found interesting: direct
//! calls, tail-call dispatches and returns. Source locations start out as raw
//! debug-metadata ids and are filled in by the resolution pass once the whole
//! input has been scanned.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// File name recorded on functions and steps whose debug reference could not
/// be resolved.
pub const NOT_FOUND_FILE: &str = "not found";

/// A resolved source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRef {
    pub file: String,
    pub line: u32,
}

impl SourceRef {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self { file: file.into(), line }
    }

    /// Placeholder location for entities whose debug chain is broken.
    pub fn not_found() -> Self {
        Self { file: NOT_FOUND_FILE.to_string(), line: 0 }
    }

    pub fn is_resolved(&self) -> bool {
        self.file != NOT_FOUND_FILE
    }
}

impl Default for SourceRef {
    fn default() -> Self {
        Self::not_found()
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Linkage of a function definition as written after `define`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    Internal,
    DsoLocal,
}

impl Linkage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Linkage::Internal => "internal",
            Linkage::DsoLocal => "dso_local",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "internal" => Some(Linkage::Internal),
            "dso_local" => Some(Linkage::DsoLocal),
            _ => None,
        }
    }
}

/// Whether a function is an ordinary helper or a tail-call entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FnKind {
    Internal,
    Tail,
}

impl FnKind {
    /// Exported symbols are always dispatch targets; internal ones only when
    /// they were placed in a program section.
    pub fn classify(linkage: Linkage, has_section: bool) -> Self {
        match linkage {
            Linkage::DsoLocal => FnKind::Tail,
            Linkage::Internal if has_section => FnKind::Tail,
            Linkage::Internal => FnKind::Internal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FnKind::Internal => "internal",
            FnKind::Tail => "tail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Call,
    TailCall,
    Return,
}

/// One instruction of interest inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    /// Callee or dispatch target. Empty for returns and for tail calls whose
    /// index is not in the table.
    pub target: String,
    pub source: SourceRef,
    /// Raw `!dbg` id, consulted only by the resolution pass.
    pub dbg_ref: Option<u64>,
}

impl Step {
    pub fn call(target: impl Into<String>, dbg_ref: Option<u64>) -> Self {
        Self { kind: StepKind::Call, target: target.into(), source: SourceRef::not_found(), dbg_ref }
    }

    pub fn tail_call(target: impl Into<String>, dbg_ref: Option<u64>) -> Self {
        Self {
            kind: StepKind::TailCall,
            target: target.into(),
            source: SourceRef::not_found(),
            dbg_ref,
        }
    }

    pub fn ret(dbg_ref: Option<u64>) -> Self {
        Self { kind: StepKind::Return, target: String::new(), source: SourceRef::not_found(), dbg_ref }
    }

    /// Name of the function this step may transfer control to, if any.
    pub fn edge_target(&self) -> Option<&str> {
        match self.kind {
            StepKind::Call | StepKind::TailCall if !self.target.is_empty() => Some(&self.target),
            _ => None,
        }
    }
}

/// One defined symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDef {
    pub name: String,
    pub linkage: Linkage,
    pub kind: FnKind,
    pub source: SourceRef,
    pub steps: Vec<Step>,
    /// Raw `!dbg` id of the function's subprogram record.
    pub dbg_ref: Option<u64>,
}

impl FnDef {
    pub fn new(name: impl Into<String>, linkage: Linkage, kind: FnKind) -> Self {
        Self {
            name: name.into(),
            linkage,
            kind,
            source: SourceRef::not_found(),
            steps: Vec::new(),
            dbg_ref: None,
        }
    }

    /// Iterate the names this function calls or tail-calls, in step order.
    pub fn callees(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(Step::edge_target)
    }
}

/// All functions defined in one IR file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub functions: BTreeMap<String, FnDef>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a function, replacing any earlier definition with the same name.
    pub fn insert(&mut self, def: FnDef) -> Option<FnDef> {
        self.functions.insert(def.name.clone(), def)
    }

    pub fn get(&self, name: &str) -> Option<&FnDef> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FnDef> {
        self.functions.values()
    }

    /// Human-readable listing of every function and its steps.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for def in self.functions.values() {
            out.push_str(&format!(
                "fn:{} [{} {}] {}\n",
                def.name,
                def.linkage.as_str(),
                def.kind.as_str(),
                def.source
            ));
            for step in &def.steps {
                match step.kind {
                    StepKind::Return => out.push_str(&format!("  ret {}\n", step.source)),
                    StepKind::Call => {
                        out.push_str(&format!("  call {} {}\n", step.target, step.source))
                    }
                    StepKind::TailCall => {
                        out.push_str(&format!("  tail {} {}\n", step.target, step.source))
                    }
                }
            }
        }
        out
    }
}
