use autocover_core::parse::{
    parse_jest_json, parse_jest_stdout, parse_pytest_json, parse_surefire_stdout,
};
use autocover_core::process::ProcessOutput;
use autocover_core::profile::{JavaScriptProfile, LanguageProfile, PythonProfile, RawTestRun};
use pretty_assertions::assert_eq;

fn ok_output(stdout: &str) -> ProcessOutput {
    ProcessOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 0,
        timed_out: false,
    }
}

fn failed_output(stdout: &str) -> ProcessOutput {
    ProcessOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 1,
        timed_out: false,
    }
}

// ─── pytest ────────────────────────────────────────────────────────

#[test]
fn pytest_report_counts_and_failures() {
    let raw = r#"{
        "summary": {"total": 3, "passed": 2, "failed": 1},
        "tests": [
            {"nodeid": "tests/test_calc.py::test_add", "outcome": "passed"},
            {"nodeid": "tests/test_calc.py::test_sub", "outcome": "passed"},
            {"nodeid": "tests/test_calc.py::test_mul", "outcome": "failed",
             "call": {"longrepr": "assert 6 == 7"}}
        ]
    }"#;

    let counts = parse_pytest_json(raw).unwrap();
    assert_eq!(counts.tests_run, 3);
    assert_eq!(counts.tests_passed, 2);
    assert_eq!(counts.tests_failed, 1);
    assert_eq!(counts.failures.len(), 1);
    assert_eq!(counts.failures[0].test_name, "tests/test_calc.py::test_mul");
    assert_eq!(counts.failures[0].error_message.as_deref(), Some("assert 6 == 7"));
    assert!(!counts.failures[0].passed);
}

#[test]
fn pytest_report_with_missing_summary_keys() {
    // The plugin omits keys for zero-count outcomes.
    let raw = r#"{"summary": {"total": 2, "passed": 2}, "tests": []}"#;
    let counts = parse_pytest_json(raw).unwrap();
    assert_eq!(counts.tests_run, 2);
    assert_eq!(counts.tests_failed, 0);
}

#[test]
fn pytest_garbled_report_yields_none() {
    assert!(parse_pytest_json("not json at all").is_none());
    assert!(parse_pytest_json("{\"summary\": [1,2]}").is_none());
}

// ─── jest ──────────────────────────────────────────────────────────

#[test]
fn jest_json_counts_and_failures() {
    let raw = r#"{
        "numTotalTests": 2, "numPassedTests": 1, "numFailedTests": 1,
        "testResults": [{
            "assertionResults": [
                {"fullName": "adds numbers", "status": "passed", "failureMessages": []},
                {"fullName": "subtracts numbers", "status": "failed",
                 "failureMessages": ["expected 1 but got 2"]}
            ]
        }]
    }"#;

    let counts = parse_jest_json(raw).unwrap();
    assert_eq!(counts.tests_run, 2);
    assert_eq!(counts.tests_failed, 1);
    assert_eq!(counts.failures.len(), 1);
    assert_eq!(counts.failures[0].test_name, "subtracts numbers");
    assert_eq!(
        counts.failures[0].error_message.as_deref(),
        Some("expected 1 but got 2")
    );
}

#[test]
fn jest_stdout_summary_line() {
    let out = "Tests:       1 failed, 2 passed, 3 total\nSnapshots:   0 total";
    let counts = parse_jest_stdout(out).unwrap();
    assert_eq!(counts.tests_failed, 1);
    assert_eq!(counts.tests_passed, 2);
    assert_eq!(counts.tests_run, 3);
    assert!(counts.failures.is_empty());
}

#[test]
fn jest_stdout_without_summary_yields_none() {
    assert!(parse_jest_stdout("npm ERR! missing script: test").is_none());
    assert!(parse_jest_stdout("").is_none());
}

#[test]
fn jest_prefers_structured_file_over_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("results.json");
    std::fs::write(
        &report_path,
        r#"{"numTotalTests": 4, "numPassedTests": 3, "numFailedTests": 1,
            "testResults": [{"assertionResults": [
                {"fullName": "broken case", "status": "failed",
                 "failureMessages": ["boom"]}]}]}"#,
    )
    .unwrap();

    // stdout disagrees with the structured file; the file wins.
    let raw = RawTestRun {
        output: failed_output("Tests:       9 failed, 9 passed, 18 total"),
        report_file: Some(report_path),
    };
    let report = JavaScriptProfile::new().normalize(&raw);
    assert_eq!(report.tests_run, 4);
    assert_eq!(report.tests_failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].test_name, "broken case");
}

#[test]
fn jest_falls_back_to_stdout_when_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let raw = RawTestRun {
        output: ok_output("Tests:       2 passed, 2 total"),
        report_file: Some(dir.path().join("does-not-exist.json")),
    };
    let report = JavaScriptProfile::new().normalize(&raw);
    assert_eq!(report.tests_run, 2);
    assert_eq!(report.tests_passed, 2);
    assert!(report.success);
}

// ─── surefire ──────────────────────────────────────────────────────

#[test]
fn surefire_summary_counts() {
    let out = "[INFO] Results:\n[INFO] Tests run: 5, Failures: 1, Errors: 1, Skipped: 0\n";
    let counts = parse_surefire_stdout(out).unwrap();
    assert_eq!(counts.tests_run, 5);
    assert_eq!(counts.tests_failed, 2);
    assert_eq!(counts.tests_passed, 3);
}

#[test]
fn surefire_garbled_output_yields_none() {
    assert!(parse_surefire_stdout("[ERROR] BUILD FAILURE").is_none());
    assert!(parse_surefire_stdout("").is_none());
}

// ─── degraded normalization ────────────────────────────────────────

#[test]
fn pytest_missing_report_file_keeps_zeroed_counts() {
    // Simulates a runner crash before report generation.
    let dir = tempfile::tempdir().unwrap();
    let raw = RawTestRun {
        output: failed_output("INTERNALERROR> boom"),
        report_file: Some(dir.path().join("results.json")),
    };
    let report = PythonProfile::new().normalize(&raw);
    assert!(!report.success);
    assert_eq!(report.tests_run, 0);
    assert_eq!(report.tests_passed, 0);
    assert_eq!(report.tests_failed, 0);
    assert!(report.counts_consistent());
    assert_eq!(report.return_code, Some(1));
}

#[test]
fn timed_out_run_is_a_distinct_failure() {
    let raw = RawTestRun {
        output: ProcessOutput {
            stdout: String::new(),
            stderr: "process timed out after 120s".to_string(),
            exit_code: -1,
            timed_out: true,
        },
        report_file: None,
    };
    let report = PythonProfile::new().normalize(&raw);
    assert!(!report.success);
    assert_eq!(report.error.as_deref(), Some("test runner timed out"));
}
