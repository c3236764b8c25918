#![allow(dead_code)]

use tailmap_core::model::Module;
use tailmap_core::parser::parse;
use tailmap_core::tailcall::TailCallTable;

/// Trimmed-down datapath module: one entry program that calls a helper,
/// tail-calls slot 7 and reaches the drop notifier through slot 1. Debug
/// records follow the code, as the compiler emits them.
pub const SAMPLE_IR: &str = r#"; ModuleID = 'bpf_lxc.c'
source_filename = "bpf_lxc.c"
target triple = "bpf"

define dso_local i32 @cil_from_container(ptr noundef %ctx) #0 section "from-container" !dbg !10 {
entry:
  %call = call i32 @validate(ptr noundef %ctx), !dbg !40
  call void @llvm.dbg.value(metadata ptr %ctx, metadata !12, metadata !DIExpression()), !dbg !40
  call void @tail_call_internal(ptr noundef %ctx, i32 noundef 7, ptr noundef null), !dbg !41
  %r = call i32 @send_drop(ptr noundef %ctx), !dbg !42
  ret i32 %r, !dbg !43
}

define internal i32 @validate(ptr noundef %ctx) #0 !dbg !20 {
entry:
  %0 = call i32 @ctx_data_end(ptr noundef %ctx), !dbg !30
  ret i32 %0, !dbg !31
}

define internal i32 @tail_handle_ipv4(ptr noundef %ctx) #0 section "2/7" !dbg !50 {
entry:
  %call = call i32 @validate(ptr noundef %ctx), !dbg !60
  ret i32 %call, !dbg !61
}

define internal i32 @send_drop(ptr noundef %ctx) #0 !dbg !70 {
entry:
  call void @tail_call_internal(ptr noundef %ctx, i32 noundef 1, ptr noundef null), !dbg !80
  ret i32 2, !dbg !81
}

define internal i32 @__send_drop_notify(ptr noundef %ctx) #0 section "2/1" !dbg !90 {
entry:
  ret i32 0, !dbg !91
}

declare i32 @ctx_data_end(ptr noundef)

attributes #0 = { noinline nounwind }

!llvm.dbg.cu = !{!2}
!2 = distinct !DICompileUnit(language: DW_LANG_C99, file: !3, producer: "clang", isOptimized: true)
!3 = !DIFile(filename: "bpf_lxc.c", directory: "/src/bpf")
!4 = !DIFile(filename: "lib/drop.h", directory: "/src/bpf")
!10 = distinct !DISubprogram(name: "cil_from_container", scope: !3, file: !3, line: 100, type: !5, scopeLine: 101, unit: !2)
!20 = distinct !DISubprogram(name: "validate", scope: !3, file: !3, line: 40, type: !5, scopeLine: 41, unit: !2)
!30 = !DILocation(line: 42, column: 9, scope: !20)
!31 = !DILocation(line: 43, column: 2, scope: !20)
!40 = !DILocation(line: 104, column: 8, scope: !10)
!41 = !DILocation(line: 110, column: 3, scope: !44)
!42 = !DILocation(line: 112, column: 7, scope: !10)
!43 = !DILocation(line: 113, scope: !10)
!44 = distinct !DILexicalBlock(scope: !10, file: !3, line: 109, column: 6)
!50 = distinct !DISubprogram(name: "tail_handle_ipv4", scope: !3, file: !3, line: 200, type: !5, scopeLine: 201, unit: !2)
!60 = !DILocation(line: 205, column: 9, scope: !50)
!61 = !DILocation(line: 206, column: 2, scope: !50)
!70 = distinct !DISubprogram(name: "send_drop", scope: !4, file: !4, line: 10, type: !5, scopeLine: 11, unit: !2)
!80 = !DILocation(line: 15, column: 2, scope: !70)
!81 = !DILocation(line: 16, column: 2, scope: !70)
!90 = distinct !DISubprogram(name: "__send_drop_notify", scope: !4, file: !4, line: 30, type: !5, scopeLine: 31, unit: !2)
!91 = !DILocation(line: 35, column: 2, scope: !90)
"#;

pub fn sample_module() -> Module {
    parse(SAMPLE_IR, &TailCallTable::cilium()).expect("parse sample")
}

/// Module text from `"name: callee callee"` entries; each function calls its
/// callees in order and returns. No debug records.
pub fn call_chain_ir(entries: &[&str]) -> String {
    let mut out = String::new();
    for &entry in entries {
        let (name, callees) = entry.split_once(":").unwrap_or((entry, ""));
        out.push_str(&format!("define internal void @{}() {{\n", name.trim()));
        for callee in callees.split_whitespace() {
            out.push_str(&format!("  call void @{callee}()\n"));
        }
        out.push_str("  ret void\n}\n\n");
    }
    out
}

pub fn call_chain(entries: &[&str]) -> Module {
    parse(&call_chain_ir(entries), &TailCallTable::new()).expect("parse call chain")
}
