use tailmap_core::annotations::{
    parse_annotations, parse_record, Annotation, AnnotationKind, AnnotationSet, RecordError,
};

fn note(file: &str, line: u32, text: &str) -> Annotation {
    Annotation::new(file, line, AnnotationKind::Note, text)
}

#[test]
fn lookup_is_half_open() {
    let set: AnnotationSet = [note("bpf_lxc.c", 100, "here")].into_iter().collect();
    assert_eq!(set.lookup("bpf_lxc.c", 100, 101).len(), 1);
    assert!(set.lookup("bpf_lxc.c", 99, 100).is_empty());
    assert!(set.lookup("bpf_lxc.c", 100, 100).is_empty());
    assert!(set.lookup("other.c", 0, 1000).is_empty());
}

#[test]
fn lookup_returns_annotations_sorted_by_line() {
    let mut set = AnnotationSet::new();
    set.add(note("f.c", 30, "c"));
    set.add(note("f.c", 10, "a"));
    set.add(note("f.c", 20, "b"));
    set.add(note("f.c", 20, "b2"));
    set.add(note("g.c", 15, "other"));

    let texts: Vec<&str> = set.lookup("f.c", 10, 31).iter().map(|a| a.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "b2", "c"]);
    let middle: Vec<u32> = set.lookup("f.c", 11, 30).iter().map(|a| a.line).collect();
    assert_eq!(middle, vec![20, 20]);
    assert_eq!(set.len(), 5);
    assert!(!set.is_empty());
}

#[test]
fn record_parses_tags_and_keeps_colons_in_text() {
    let an = parse_record("bpf_lxc.c:120:Conditional:feature=ipv4,hot:#if defined(A) && B: x")
        .expect("parse");
    assert_eq!(an.file_name, "bpf_lxc.c");
    assert_eq!(an.line, 120);
    assert_eq!(an.kind, AnnotationKind::Conditional);
    assert_eq!(an.tags.get("feature"), Some(&Some("ipv4".to_string())));
    assert_eq!(an.tags.get("hot"), Some(&None));
    assert_eq!(an.text, "#if defined(A) && B: x");
}

#[test]
fn display_round_trips_through_the_parser() {
    let mut an = note("lib/nat.h", 7, "check: mtu");
    an.tags.insert("owner".into(), Some("nat".into()));
    an.tags.insert("todo".into(), None);
    let text = an.to_string();
    assert_eq!(text, "lib/nat.h:7:Note:owner=nat,todo:check: mtu");
    assert_eq!(parse_record(&text).expect("reparse"), an);
}

#[test]
fn record_errors_name_the_bad_field() {
    assert_eq!(parse_record("a.c:1:Note"), Err(RecordError::FieldCount));
    assert_eq!(parse_record("a.c:x:Note::t"), Err(RecordError::Line("x".into())));
    assert_eq!(parse_record("a.c:1:Todo::t"), Err(RecordError::Kind("Todo".into())));
    assert_eq!(parse_record("a.c:1:Note:a=b=c:t"), Err(RecordError::Tag("a=b=c".into())));
    assert_eq!(parse_record("a.c:1:Note:=v:t"), Err(RecordError::Tag("=v".into())));
}

#[test]
fn three_field_line_fails_with_file_and_line() {
    let text = "# generated\n\nbpf_lxc.c:10:Note::fine\nbpf_lxc.c:11:Note\n";
    let err = parse_annotations("lxc.an", text).unwrap_err();
    assert_eq!(err.source_name, "lxc.an");
    assert_eq!(err.line, 4);
    assert_eq!(err.error, RecordError::FieldCount);
    assert!(err.to_string().starts_with("lxc.an:4:"), "{err}");
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    let text = "\n# comment\n   \nf.c:1:Note::one\n  f.c:2:Conditional::#endif  \n";
    let annotations = parse_annotations("f.an", text).expect("parse");
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[1].kind, AnnotationKind::Conditional);
    assert_eq!(annotations[1].text, "#endif");

    let mut set = AnnotationSet::new();
    set.extend(annotations);
    assert_eq!(set.lookup("f.c", 1, 3).len(), 2);
}

#[test]
fn kind_names_parse_and_print() {
    assert_eq!("Note".parse::<AnnotationKind>(), Ok(AnnotationKind::Note));
    assert!("note".parse::<AnnotationKind>().is_err());
    assert_eq!(AnnotationKind::Conditional.to_string(), "Conditional");
}
