mod common;

use std::collections::BTreeSet;

use tailmap_core::closure::{closure, reachable, ClosureError};

use common::{call_chain, sample_module};

#[test]
fn cycle_visits_each_function_once() {
    let module = call_chain(&["a: b", "b: a"]);
    let mut visits = Vec::new();
    closure(
        &module,
        "a",
        |def| {
            visits.push(def.name.clone());
            true
        },
        |_, _| false,
    )
    .expect("closure");
    visits.sort();
    assert_eq!(visits, vec!["a", "b"]);
}

#[test]
fn self_recursion_terminates() {
    let module = call_chain(&["a: a a"]);
    assert_eq!(reachable(&module, "a", |_, _| false).expect("closure"), vec!["a"]);
}

#[test]
fn missing_start_is_an_error() {
    let module = call_chain(&["a: b", "b"]);
    let err = reachable(&module, "nope", |_, _| false).unwrap_err();
    assert_eq!(err, ClosureError::StartNotFound("nope".into()));
}

#[test]
fn visitor_returning_false_on_start_stops_everything() {
    let module = call_chain(&["a: b c", "b: d", "c", "d"]);
    let mut visits = 0;
    closure(
        &module,
        "a",
        |_| {
            visits += 1;
            false
        },
        |_, _| false,
    )
    .expect("closure");
    assert_eq!(visits, 1);
}

#[test]
fn visitor_returning_false_later_halts_all_branches() {
    let module = call_chain(&["a: b c", "b: d", "c: e", "d", "e"]);
    let mut seen = Vec::new();
    closure(
        &module,
        "a",
        |def| {
            seen.push(def.name.clone());
            seen.len() < 2
        },
        |_, _| false,
    )
    .expect("closure");
    // The walk stops at the second function, whichever child that is.
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().any(|name| name == "a"));
    assert!(seen.iter().all(|name| name != "d" && name != "e"));
}

#[test]
fn edge_filter_prunes_subtrees() {
    let module = call_chain(&["a: b c", "b: d", "c", "d"]);
    let names: BTreeSet<String> = reachable(&module, "a", |_, step| step.target == "b")
        .expect("closure")
        .into_iter()
        .collect();
    assert_eq!(names, BTreeSet::from(["a".to_string(), "c".to_string()]));
}

#[test]
fn edge_filter_only_sees_defined_targets() {
    let module = call_chain(&["a: b undefined", "b"]);
    let mut asked = Vec::new();
    closure(
        &module,
        "a",
        |_| true,
        |_, step| {
            asked.push(step.target.clone());
            false
        },
    )
    .expect("closure");
    assert_eq!(asked, vec!["b"]);
}

#[test]
fn tail_calls_are_followed() {
    let module = sample_module();
    let names: BTreeSet<String> =
        reachable(&module, "cil_from_container", |_, _| false).expect("closure").into_iter().collect();
    let expected: BTreeSet<String> =
        ["cil_from_container", "validate", "tail_handle_ipv4", "send_drop", "__send_drop_notify"]
            .into_iter()
            .map(String::from)
            .collect();
    assert_eq!(names, expected);
}
