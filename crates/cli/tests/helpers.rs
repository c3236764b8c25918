use std::fs;
use std::path::PathBuf;

use tailmap::commands::{expand_ignore, render_annotations, summarize};
use tailmap::{load_annotations, parse_input, resolve_ignore, sha256_file, strip_prefix};
use tailmap_core::config::ToolConfig;
use tailmap_core::model::{FnKind, Linkage};
use tempfile::tempdir;

#[test]
fn sha256_file_matches_known_digest() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("abc.txt");
    fs::write(&path, "abc").expect("write");
    assert_eq!(
        sha256_file(&path).expect("hash"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn strip_prefix_only_strips_leading_match() {
    assert_eq!(strip_prefix("/src/bpf/bpf_lxc.c", Some("/src/bpf/")), "bpf_lxc.c");
    assert_eq!(strip_prefix("bpf_lxc.c", Some("/src/")), "bpf_lxc.c");
    assert_eq!(strip_prefix("bpf_lxc.c", None), "bpf_lxc.c");
}

#[test]
fn resolve_ignore_prefers_explicit_names() {
    let config = ToolConfig::default();
    let explicit = resolve_ignore(&["only".to_string()], &config).expect("expand");
    assert_eq!(explicit.iter().collect::<Vec<_>>(), vec!["only"]);

    let fallback = resolve_ignore(&[], &config).expect("expand default");
    assert!(fallback.contains("llvm"));
}

#[test]
fn load_annotations_merges_files() {
    let dir = tempdir().expect("tempdir");
    let a = dir.path().join("a.an");
    let b = dir.path().join("b.an");
    fs::write(&a, "f.c:3:Note::three\n").expect("write a");
    fs::write(&b, "f.c:1:Note::one\ng.c:2:Conditional::#else\n").expect("write b");

    let set = load_annotations(&[a, b]).expect("load");
    assert_eq!(set.len(), 3);
    let lines: Vec<u32> = set.lookup("f.c", 0, 10).iter().map(|an| an.line).collect();
    assert_eq!(lines, vec![1, 3]);
}

#[test]
fn load_annotations_of_missing_file_fails() {
    let err = load_annotations(&[PathBuf::from("/no/such/file.an")]).unwrap_err();
    assert!(err.to_string().contains("/no/such/file.an"));
}

#[test]
fn summarize_reports_kinds_and_steps() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("m.ll");
    fs::write(&path, "define internal void @a() {\n  call void @b()\n  ret void\n}\n").expect("write");

    let module = parse_input(&path).expect("parse");
    let rows = summarize(&module);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "a");
    assert_eq!(rows[0].kind, FnKind::Internal);
    assert_eq!(rows[0].linkage, Linkage::Internal);
    assert!(!rows[0].source.is_resolved());
    assert_eq!(rows[0].steps, 2);
}

#[test]
fn expand_ignore_without_config_uses_builtins() {
    let names = expand_ignore(&["@builtins".to_string()], None).expect("expand");
    assert_eq!(names, vec!["llvm", "memcpy", "memset"]);
}

#[test]
fn render_annotations_keeps_full_path_without_strip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("x.c");
    fs::write(&path, "#if 0\n#endif\n").expect("write");
    let out = render_annotations(&path, None).expect("render");
    assert_eq!(out.lines().count(), 2);
    assert!(out.starts_with(&format!("{}:1:Conditional::#if 0", path.display())), "{out}");
}
