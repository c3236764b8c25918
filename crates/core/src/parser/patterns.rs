//! Line recognizers for the IR subset the parser understands.

use std::sync::OnceLock;

use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect(concat!("invalid pattern ", stringify!($name))))
        }
    };
}

pattern!(fn_start, r"^define\b.*\{");
pattern!(fn_header, r"^define\s+([A-Za-z_]+)\s.*?@([A-Za-z0-9_.$]+)\(");
pattern!(fn_section, r#"\ssection "[0-9]+/[0-9]+"\s"#);
pattern!(fn_end, r"^\}");

pattern!(tail_call_internal, r"\bcall\b.*@tail_call_internal\(");
pattern!(tail_call_index, r"@tail_call_internal\([^,]*,\s*i32\s+(?:noundef\s+)?([^,\s)]+)");
pattern!(tail_call_dynamic, r"\bcall\b.*@tail_call_dynamic\(");
pattern!(tail_call_policy, r"\bcall\b.*@tail_call_policy\(");
pattern!(tail_call_egress_policy, r"\bcall\b.*@tail_call_egress_policy\(");

pattern!(call, r"^\s+(?:%[-A-Za-z0-9_.$]+\s*=\s*)?(?:(?:tail|musttail|notail)\s+)?call\b");
pattern!(call_indirect, r"\bcall\b[^@]*?\s%[-A-Za-z0-9_.$]+\(");
pattern!(call_asm, r"\bcall\b[^@]*\basm\b");
pattern!(call_symbol, r"\bcall\b[^@]*@([A-Za-z0-9_.$]+)");

pattern!(ret, r"^\s+ret\b");
pattern!(debug_ref, r"!dbg !([0-9]+)");

pattern!(di_location, r"^\s*!([0-9]+) = (?:distinct )?!DILocation\(");
pattern!(di_lexical_block, r"^\s*!([0-9]+) = (?:distinct )?!DILexicalBlock\(");
pattern!(di_file, r"^\s*!([0-9]+) = (?:distinct )?!DIFile\(");
pattern!(di_subprogram, r"^\s*!([0-9]+) = (?:distinct )?!DISubprogram\(");

pattern!(field_line, r"\bline: ([0-9]+)");
pattern!(field_column, r"\bcolumn: ([0-9]+)");
pattern!(field_scope, r"\bscope: !([0-9]+)");
pattern!(field_file, r"\bfile: !([0-9]+)");
pattern!(field_filename, r#"\bfilename: "([^"]*)""#);
pattern!(field_name, r#"\bname: "([^"]*)""#);

/// What a recognized line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind {
    FnStart,
    FnEnd,
    TailCallInternal,
    TailCallDynamic,
    TailCallPolicy,
    TailCallEgressPolicy,
    Call,
    Return,
    DiLocation,
    DiLexicalBlock,
    DiFile,
    DiSubprogram,
}

/// Recognizers in priority order; the first match claims the line.
const RECOGNIZERS: &[(LineKind, fn() -> &'static Regex)] = &[
    (LineKind::FnStart, fn_start),
    (LineKind::FnEnd, fn_end),
    (LineKind::TailCallInternal, tail_call_internal),
    (LineKind::TailCallDynamic, tail_call_dynamic),
    (LineKind::TailCallPolicy, tail_call_policy),
    (LineKind::TailCallEgressPolicy, tail_call_egress_policy),
    (LineKind::Call, call),
    (LineKind::Return, ret),
    (LineKind::DiLocation, di_location),
    (LineKind::DiLexicalBlock, di_lexical_block),
    (LineKind::DiFile, di_file),
    (LineKind::DiSubprogram, di_subprogram),
];

pub(crate) fn classify(line: &str) -> Option<LineKind> {
    RECOGNIZERS.iter().find(|(_, re)| re().is_match(line)).map(|(kind, _)| *kind)
}
