//! Line-oriented IR parser and module builder.
//!
//! The input is scanned once. Function boundaries, call/tail-call/return
//! instructions and debug-metadata records are recognized by the line patterns
//! below; everything else is skipped. Debug records are only indexed
//! during the scan and applied to the module after the last line, since they
//! are normally declared after their first use.

mod patterns;
mod window;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::debuginfo::{DebugInfo, LexicalBlock, Location, SourceFile, Subprogram};
use crate::model::{FnDef, FnKind, Linkage, Module, Step};
use crate::tailcall::TailCallTable;

pub use window::DEFAULT_WINDOW;

use patterns::LineKind;
use window::LineWindow;

/// Name every `@llvm.*` intrinsic call is recorded under.
pub const INTRINSIC_NAME: &str = "llvm";

/// Helper the datapath uses for static tail-call dispatch.
pub const TAIL_CALL_HELPER: &str = "tail_call_internal";

/// Structural errors. Each carries the 1-based input line and its text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: {reason}: {text:?}")]
    Malformed { line: usize, text: String, reason: String },

    #[error("line {line}: instruction outside of a function: {text:?}")]
    StepOutsideFunction { line: usize, text: String },

    #[error("line {line}: function end without a function start: {text:?}")]
    UnmatchedFunctionEnd { line: usize, text: String },

    #[error("line {line}: unsupported linkage {linkage:?}: {text:?}")]
    UnsupportedLinkage { line: usize, text: String, linkage: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::Malformed { line, .. }
            | ParseError::StepOutsideFunction { line, .. }
            | ParseError::UnmatchedFunctionEnd { line, .. }
            | ParseError::UnsupportedLinkage { line, .. } => *line,
        }
    }
}

/// Parse IR text into a [`Module`] with resolved source locations.
///
/// `table` maps `tail_call_internal` slot indices to program names.
pub fn parse(text: &str, table: &TailCallTable) -> Result<Module, ParseError> {
    let mut ctx = ParseContext::new(table);
    for line in text.lines() {
        ctx.window.push(line);
        if let Err(err) = ctx.handle_line(line) {
            debug!(
                context = %ctx.window.lookback(5).collect::<Vec<_>>().join("\n"),
                failing = ctx.window.current(),
                "parse failed at line {}",
                err.line()
            );
            return Err(err);
        }
    }
    Ok(ctx.finish())
}

struct ParseContext<'a> {
    table: &'a TailCallTable,
    module: Module,
    current: Option<FnDef>,
    debug: DebugInfo,
    window: LineWindow<'a>,
}

impl<'a> ParseContext<'a> {
    fn new(table: &'a TailCallTable) -> Self {
        Self {
            table,
            module: Module::new(),
            current: None,
            debug: DebugInfo::new(),
            window: LineWindow::new(DEFAULT_WINDOW),
        }
    }

    fn handle_line(&mut self, line: &str) -> Result<(), ParseError> {
        let Some(kind) = patterns::classify(line) else {
            return Ok(());
        };
        trace!(line = self.window.line_number(), ?kind, "recognized");
        match kind {
            LineKind::FnStart => self.fn_start(line),
            LineKind::FnEnd => self.fn_end(line),
            LineKind::TailCallInternal => self.tail_call_internal(line),
            // Dynamic and policy dispatch targets come from runtime map
            // contents and cannot be named from the IR.
            LineKind::TailCallDynamic
            | LineKind::TailCallPolicy
            | LineKind::TailCallEgressPolicy => Ok(()),
            LineKind::Call => self.call(line),
            LineKind::Return => self.ret(line),
            LineKind::DiLocation => self.di_location(line),
            LineKind::DiLexicalBlock => self.di_lexical_block(line),
            LineKind::DiFile => self.di_file(line),
            LineKind::DiSubprogram => self.di_subprogram(line),
        }
    }

    fn finish(mut self) -> Module {
        if let Some(open) = self.current.take() {
            warn!(function = %open.name, "input ended inside a function");
            self.close(open);
        }
        let unresolved = self.debug.apply(&mut self.module);
        debug!(
            lines = self.window.line_number(),
            functions = self.module.len(),
            debug_records = self.debug.len(),
            unresolved,
            "parsed module"
        );
        self.module
    }

    fn malformed(&self, line: &str, reason: impl Into<String>) -> ParseError {
        ParseError::Malformed {
            line: self.window.line_number(),
            text: line.to_string(),
            reason: reason.into(),
        }
    }

    fn close(&mut self, def: FnDef) {
        if let Some(prev) = self.module.insert(def) {
            debug!(function = %prev.name, "function redefined; keeping the last definition");
        }
    }

    fn push_step(&mut self, line: &str, step: Step) -> Result<(), ParseError> {
        match self.current.as_mut() {
            Some(def) => {
                def.steps.push(step);
                Ok(())
            }
            None => Err(ParseError::StepOutsideFunction {
                line: self.window.line_number(),
                text: line.to_string(),
            }),
        }
    }

    /// The `!dbg !N` reference on `line`, if present.
    fn debug_ref(&self, line: &str) -> Result<Option<u64>, ParseError> {
        match patterns::debug_ref().captures(line) {
            Some(caps) => self.number(line, &caps[1], "debug reference").map(Some),
            None => Ok(None),
        }
    }

    fn number<T: std::str::FromStr>(&self, line: &str, raw: &str, what: &str) -> Result<T, ParseError> {
        raw.parse().map_err(|_| self.malformed(line, format!("{what} {raw:?} is not a valid number")))
    }

    /// Required numeric field of a metadata record.
    fn field<T: std::str::FromStr>(&self, line: &str, re: &Regex, what: &str) -> Result<T, ParseError> {
        let caps = re.captures(line).ok_or_else(|| self.malformed(line, format!("missing {what}")))?;
        self.number(line, &caps[1], what)
    }

    /// Numeric field the IR writer leaves out when it is zero or null.
    fn optional_field<T: std::str::FromStr + Default>(&self, line: &str, re: &Regex, what: &str) -> Result<T, ParseError> {
        match re.captures(line) {
            Some(caps) => self.number(line, &caps[1], what),
            None => Ok(T::default()),
        }
    }

    fn record_id(&self, line: &str, re: &Regex) -> Result<u64, ParseError> {
        self.field(line, re, "metadata id")
    }

    fn fn_start(&mut self, line: &str) -> Result<(), ParseError> {
        let caps = patterns::fn_header()
            .captures(line)
            .ok_or_else(|| self.malformed(line, "function definition without a symbol"))?;
        let linkage = Linkage::from_keyword(&caps[1]).ok_or_else(|| ParseError::UnsupportedLinkage {
            line: self.window.line_number(),
            text: line.to_string(),
            linkage: caps[1].to_string(),
        })?;
        let kind = FnKind::classify(linkage, patterns::fn_section().is_match(line));

        let mut def = FnDef::new(&caps[2], linkage, kind);
        def.dbg_ref = self.debug_ref(line)?;

        if let Some(open) = self.current.take() {
            warn!(function = %open.name, next = %def.name, "function not closed before next definition");
            self.close(open);
        }
        self.current = Some(def);
        Ok(())
    }

    fn fn_end(&mut self, line: &str) -> Result<(), ParseError> {
        let def = self.current.take().ok_or_else(|| ParseError::UnmatchedFunctionEnd {
            line: self.window.line_number(),
            text: line.to_string(),
        })?;
        self.close(def);
        Ok(())
    }

    fn tail_call_internal(&mut self, line: &str) -> Result<(), ParseError> {
        let caps = patterns::tail_call_index()
            .captures(line)
            .ok_or_else(|| self.malformed(line, "tail call without a slot index"))?;
        let raw = &caps[1];
        if raw.starts_with('%') {
            debug!(line = self.window.line_number(), "tail call with a computed slot index");
            return Ok(());
        }
        let index: u32 = self.number(line, raw, "tail call index")?;
        let target = match self.table.lookup(index) {
            Some(name) => name.to_string(),
            None => {
                warn!(index, line = self.window.line_number(), "tail call slot not in table");
                String::new()
            }
        };
        let step = Step::tail_call(target, self.debug_ref(line)?);
        self.push_step(line, step)
    }

    fn call(&mut self, line: &str) -> Result<(), ParseError> {
        if patterns::call_indirect().is_match(line) || patterns::call_asm().is_match(line) {
            return Ok(());
        }
        let caps = patterns::call_symbol()
            .captures(line)
            .ok_or_else(|| self.malformed(line, "call without a callee symbol"))?;
        let callee = &caps[1];
        let callee = if callee.starts_with("llvm.") { INTRINSIC_NAME } else { callee };
        let step = Step::call(callee, self.debug_ref(line)?);
        self.push_step(line, step)
    }

    fn ret(&mut self, line: &str) -> Result<(), ParseError> {
        let step = Step::ret(self.debug_ref(line)?);
        self.push_step(line, step)
    }

    fn di_location(&mut self, line: &str) -> Result<(), ParseError> {
        let id = self.record_id(line, patterns::di_location())?;
        let src_line = self.field(line, patterns::field_line(), "line")?;
        let col = self.optional_field(line, patterns::field_column(), "column")?;
        let scope = self.field(line, patterns::field_scope(), "scope")?;
        self.debug.add_location(Location { id, line: src_line, col, scope });
        Ok(())
    }

    fn di_lexical_block(&mut self, line: &str) -> Result<(), ParseError> {
        let id = self.record_id(line, patterns::di_lexical_block())?;
        let scope = self.field(line, patterns::field_scope(), "scope")?;
        let file = self.optional_field(line, patterns::field_file(), "file")?;
        self.debug.add_lexical_block(LexicalBlock { id, file, scope });
        Ok(())
    }

    fn di_file(&mut self, line: &str) -> Result<(), ParseError> {
        let id = self.record_id(line, patterns::di_file())?;
        let file_name = patterns::field_filename()
            .captures(line)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| self.malformed(line, "missing filename"))?;
        self.debug.add_file(SourceFile { id, file_name });
        Ok(())
    }

    fn di_subprogram(&mut self, line: &str) -> Result<(), ParseError> {
        let id = self.record_id(line, patterns::di_subprogram())?;
        let name = patterns::field_name()
            .captures(line)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();
        let scope = self.optional_field(line, patterns::field_scope(), "scope")?;
        let file = self.optional_field(line, patterns::field_file(), "file")?;
        let src_line = self.optional_field(line, patterns::field_line(), "line")?;
        self.debug.add_subprogram(Subprogram { id, name, file, line: src_line, scope });
        Ok(())
    }
}
