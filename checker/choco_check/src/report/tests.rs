use super::*;
use std::time::Duration;

use choco_doc::{compare_verbose, Document};
use pretty_assertions::assert_eq;

fn case(name: &str, outcome: CaseOutcome) -> CaseResult {
    CaseResult::new(name, outcome, Duration::ZERO)
}

fn output(reporter: Reporter<Vec<u8>>) -> String {
    String::from_utf8(reporter.into_inner()).unwrap()
}

#[test]
fn test_simple_outcome_lines() {
    assert_eq!(
        format_case(&case("op_add", CaseOutcome::Passed), false),
        "[op_add] Passed\n"
    );
    assert_eq!(
        format_case(&case("loop", CaseOutcome::Timeout), false),
        "[loop] Timeout!\n"
    );
    assert_eq!(
        format_case(
            &case("bad", CaseOutcome::MalformedOutput("expected value".into())),
            false
        ),
        "[bad] [Error: expected value]\n"
    );
}

#[test]
fn test_structural_mismatch_block() {
    let actual = Document::from_json_str(r#"{"kind":"Program","body":[]}"#).unwrap();
    let reference = Document::from_json_str(r#"{"kind":"Program","body":[1]}"#).unwrap();
    let mismatch = compare_verbose(&actual, &reference).mismatch().cloned().unwrap();

    let block = format_case(&case("stmt", CaseOutcome::StructuralMismatch(mismatch)), false);
    assert_eq!(
        block,
        "[stmt]\nExpected 1 elements in `body`, but 0 elements are found\nFailed!\n"
    );
}

#[test]
fn test_textual_mismatch_diff_only_when_verbose() {
    let outcome = CaseOutcome::TextualMismatch {
        expected: "1\n2\n3\n".into(),
        actual: "1\n5\n".into(),
    };
    let result = case("print", outcome);

    assert_eq!(format_case(&result, false), "[print] Failed!\n");
    assert_eq!(
        format_case(&result, true),
        "[print] Failed!\n    1\n  - expected: 2\n  + actual:   5\n  - expected: 3\n  + actual:   \n"
    );
}

#[test]
fn test_non_zero_exit_shows_stderr_when_verbose() {
    let result = case(
        "crash",
        CaseOutcome::NonZeroExit {
            code: 139,
            stderr: "segfault\n".into(),
        },
    );
    assert_eq!(
        format_case(&result, false),
        "[crash] [Error: exited with status 139]\n"
    );
    assert_eq!(
        format_case(&result, true),
        "[crash] [Error: exited with status 139]\n  | segfault\n"
    );
}

#[test]
fn test_directory_lines() {
    let reporter = Reporter::new(Vec::new(), false);
    let dir = Path::new("tests/pa1/sample");
    let mut summary = DirectorySummary::new(dir, Stage::Parse);
    summary.add_result(case("a", CaseOutcome::Passed));
    summary.add_result(case("b", CaseOutcome::Timeout));

    reporter.directory_start(dir);
    reporter.directory_done(&summary);
    reporter.directory_missing(Path::new("tests/pa1/student"));

    assert_eq!(
        output(reporter),
        "[checking tests/pa1/sample]\n(Passed, Total) = (1, 2)\n[tests/pa1/student does not exist]\n"
    );
}

#[test]
fn test_headers() {
    let reporter = Reporter::new(Vec::new(), true);
    let config = CheckerConfig::for_project("/proj");
    reporter.headers(&config, Stage::Semantic);
    assert_eq!(
        output(reporter),
        "[testdata: /proj/tests]\n[executable: /proj/build]\n[checking PA2]\n"
    );
}

#[test]
fn test_concurrent_cases_do_not_interleave() {
    let reporter = Reporter::new(Vec::new(), true);
    let outcome = CaseOutcome::TextualMismatch {
        expected: "a\nb\nc\n".into(),
        actual: "x\ny\nz\n".into(),
    };
    std::thread::scope(|s| {
        for t in 0..8 {
            let reporter = &reporter;
            let outcome = outcome.clone();
            s.spawn(move || {
                for i in 0..25 {
                    reporter.case(&case(&format!("t{t}_{i}"), outcome.clone()));
                }
            });
        }
    });

    let text = output(reporter);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8 * 25 * 7);
    for block in lines.chunks(7) {
        assert!(block[0].ends_with("] Failed!"), "torn block: {block:?}");
        assert_eq!(block[1], "  - expected: a");
        assert_eq!(block[6], "  + actual:   z");
    }
}
