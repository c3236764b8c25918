//! Debug-metadata index and source-location resolver.
//!
//! The compiler emits its debug records (`!DIFile`, `!DISubprogram`,
//! `!DILexicalBlock`, `!DILocation`) as a graph of small integer ids, mostly
//! declared after the instructions that reference them. The parser only
//! records them here; lookups happen after the whole input has been scanned.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{trace, warn};

use crate::model::{Module, SourceRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: u64,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subprogram {
    pub id: u64,
    pub name: String,
    pub file: u64,
    pub line: u32,
    pub scope: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalBlock {
    pub id: u64,
    pub file: u64,
    pub scope: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: u64,
    pub line: u32,
    pub col: u32,
    pub scope: u64,
}

/// Which link of a debug chain was missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no subprogram !{0}")]
    MissingSubprogram(u64),
    #[error("no location !{0}")]
    MissingLocation(u64),
    #[error("no file !{0}")]
    MissingFile(u64),
    #[error("scope !{0} is neither a subprogram nor a lexical block")]
    UnknownScope(u64),
}

/// Arena of debug records keyed by metadata id.
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    files: HashMap<u64, SourceFile>,
    subprograms: HashMap<u64, Subprogram>,
    lexical_blocks: HashMap<u64, LexicalBlock>,
    locations: HashMap<u64, Location>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: SourceFile) {
        self.files.insert(file.id, file);
    }

    pub fn add_subprogram(&mut self, sp: Subprogram) {
        self.subprograms.insert(sp.id, sp);
    }

    pub fn add_lexical_block(&mut self, block: LexicalBlock) {
        self.lexical_blocks.insert(block.id, block);
    }

    pub fn add_location(&mut self, loc: Location) {
        self.locations.insert(loc.id, loc);
    }

    /// Total number of indexed records.
    pub fn len(&self) -> usize {
        self.files.len() + self.subprograms.len() + self.lexical_blocks.len() + self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn file_name(&self, id: u64) -> Result<&str, ResolveError> {
        self.files.get(&id).map(|f| f.file_name.as_str()).ok_or(ResolveError::MissingFile(id))
    }

    /// Source position of a function given its subprogram id.
    pub fn resolve_function(&self, id: u64) -> Result<SourceRef, ResolveError> {
        let sp = self.subprograms.get(&id).ok_or(ResolveError::MissingSubprogram(id))?;
        Ok(SourceRef::new(self.file_name(sp.file)?, sp.line))
    }

    /// Source position of an instruction given its location id.
    ///
    /// The location's scope must be a subprogram or a lexical block; a block's
    /// own file is used directly without walking further up its scope chain.
    pub fn resolve_location(&self, id: u64) -> Result<SourceRef, ResolveError> {
        let loc = self.locations.get(&id).ok_or(ResolveError::MissingLocation(id))?;
        let file = if let Some(sp) = self.subprograms.get(&loc.scope) {
            sp.file
        } else if let Some(block) = self.lexical_blocks.get(&loc.scope) {
            block.file
        } else {
            return Err(ResolveError::UnknownScope(loc.scope));
        };
        Ok(SourceRef::new(self.file_name(file)?, loc.line))
    }

    /// Fill in the source position of every function and step in `module`.
    ///
    /// Misses never fail the pass: the entity keeps the "not found"
    /// placeholder. Returns the number of unresolved entities.
    pub fn apply(&self, module: &mut Module) -> usize {
        let mut unresolved = 0;
        for def in module.functions.values_mut() {
            match def.dbg_ref.map(|id| self.resolve_function(id)) {
                Some(Ok(source)) => def.source = source,
                Some(Err(err)) => {
                    warn!(function = %def.name, error = %err, "unresolved function");
                    def.source = SourceRef::not_found();
                    unresolved += 1;
                }
                None => {
                    def.source = SourceRef::not_found();
                    unresolved += 1;
                }
            }
            for step in def.steps.iter_mut() {
                match step.dbg_ref.map(|id| self.resolve_location(id)) {
                    Some(Ok(source)) => step.source = source,
                    Some(Err(err)) => {
                        warn!(function = %def.name, error = %err, "unresolved step");
                        step.source = SourceRef::not_found();
                        unresolved += 1;
                    }
                    None => {
                        trace!(function = %def.name, "step without debug location");
                        step.source = SourceRef::not_found();
                        unresolved += 1;
                    }
                }
            }
        }
        unresolved
    }
}
