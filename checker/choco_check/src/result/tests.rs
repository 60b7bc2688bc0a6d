use super::*;
use pretty_assertions::assert_eq;

fn case(name: &str, outcome: CaseOutcome) -> CaseResult {
    CaseResult::new(name, outcome, Duration::from_millis(1))
}

#[test]
fn test_outcome_predicates() {
    assert!(CaseOutcome::Passed.is_passed());
    assert!(!CaseOutcome::Timeout.is_passed());
    assert!(!CaseOutcome::MalformedOutput("x".into()).is_passed());
    assert_eq!(CaseOutcome::Timeout.kind(), "timeout");
    assert_eq!(
        CaseOutcome::NonZeroExit {
            code: 1,
            stderr: String::new()
        }
        .kind(),
        "non-zero-exit"
    );
}

#[test]
fn test_directory_summary_counts() {
    let mut summary = DirectorySummary::new("tests/pa1/sample", Stage::Parse);
    summary.add_result(case("a", CaseOutcome::Passed));
    summary.add_result(case("b", CaseOutcome::Timeout));
    summary.add_result(case("c", CaseOutcome::LaunchFailure("gone".into())));
    summary.add_result(case("d", CaseOutcome::Passed));

    assert_eq!(summary.counts(), (2, 4));
    assert_eq!(summary.failed(), 2);
    assert!(summary.has_failures());
    assert!(!summary.missing);
}

#[test]
fn test_missing_directory_summary() {
    let summary = DirectorySummary::missing("tests/pa9/sample", Stage::CodeGen);
    assert!(summary.missing);
    assert_eq!(summary.counts(), (0, 0));
    assert!(!summary.has_failures());
}

#[test]
fn test_stage_summary_exit_code() {
    let mut summary = StageSummary::new(Stage::Parse);
    assert_eq!(summary.exit_code(), 2); // No fixtures

    let mut passing = DirectorySummary::new("sample", Stage::Parse);
    passing.add_result(case("a", CaseOutcome::Passed));
    summary.add_directory(passing);
    assert_eq!(summary.exit_code(), 0);

    let mut failing = DirectorySummary::new("student", Stage::Parse);
    failing.add_result(case("b", CaseOutcome::Timeout));
    summary.add_directory(failing);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!((summary.passed, summary.total), (1, 2));
    assert_eq!(
        summary
            .directory(Path::new("student"))
            .map(DirectorySummary::counts),
        Some((0, 1))
    );
}
