// tests/compliance_tests.rs
//
// Runs the JSON fixtures under tests/compliance. Each file holds a list of
// suites: `{"given": <document>, "cases": [{"expression", "result" | "error"}]}`.
// An `error` names the expected `ErrorKind`.

use clove_jmespath::{default_model, search, ValueModel};
use serde_json::Value;
use std::{fs, path::Path};

/// Cases this engine deliberately answers differently, as `(file, expression)`.
/// DESIGN.md records the reasoning for each.
const DEVIATIONS: &[(&str, &str)] = &[
    // Parsed as a one-element multi-select list.
    ("syntax", "[*.*]"),
];

fn is_deviation(file: &str, expression: &str) -> bool {
    DEVIATIONS
        .iter()
        .any(|&(f, e)| f == file && e == expression)
}

fn run_fixture(name: &str) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("compliance")
        .join(format!("{name}.json"));
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    let suites: Vec<Value> = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));

    let mut failures = Vec::new();
    let mut count = 0;
    let mut skipped = 0;

    for (suite_index, suite) in suites.iter().enumerate() {
        let given = &suite["given"];
        let cases = suite["cases"].as_array().expect("suite without cases");

        for case in cases {
            count += 1;
            let expression = case["expression"].as_str().expect("case without expression");
            if is_deviation(name, expression) {
                skipped += 1;
                continue;
            }
            let outcome = search(expression, given);

            match (case.get("error"), outcome) {
                (Some(expected), Ok(actual)) => failures.push(format!(
                    "[suite {suite_index}] {expression:?}: expected {expected} error, got {actual}"
                )),
                (Some(expected), Err(e)) => {
                    if Some(e.kind().name()) != expected.as_str() {
                        failures.push(format!(
                            "[suite {suite_index}] {expression:?}: expected {expected} error, got {} ({e})",
                            e.kind().name()
                        ));
                    }
                }
                (None, Ok(actual)) => {
                    let expected = &case["result"];
                    if !default_model().equals(&actual, expected) {
                        failures.push(format!(
                            "[suite {suite_index}] {expression:?}: expected {expected}, got {actual}"
                        ));
                    }
                }
                (None, Err(e)) => {
                    failures.push(format!("[suite {suite_index}] {expression:?}: unexpected error: {e}"))
                }
            }
        }
    }

    assert!(count > skipped, "{name}.json has no runnable cases");
    let listed = DEVIATIONS.iter().filter(|&&(file, _)| file == name).count();
    assert_eq!(skipped, listed, "a deviation listed for {name}.json matches no case");
    assert!(
        failures.is_empty(),
        "{} of {count} cases in {name}.json failed:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

macro_rules! compliance {
    ($($test:ident => $file:literal),* $(,)?) => {
        $(
            #[test]
            fn $test() {
                run_fixture($file);
            }
        )*
    };
}

compliance! {
    test_basic => "basic",
    test_boolean => "boolean",
    test_current => "current",
    test_escape => "escape",
    test_filters => "filters",
    test_functions => "functions",
    test_identifiers => "identifiers",
    test_indices => "indices",
    test_letexpr => "letexpr",
    test_literal => "literal",
    test_multiselect => "multiselect",
    test_pipe => "pipe",
    test_slice => "slice",
    test_syntax => "syntax",
    test_unicode => "unicode",
    test_wildcard => "wildcard",
}
