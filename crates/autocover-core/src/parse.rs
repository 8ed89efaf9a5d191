//! Result normalizers — one per native test-runner output format.
//!
//! Every parser is tolerant: missing, truncated, or garbled output yields
//! `None` (the caller keeps zeroed counts), never a panic or an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::report::{TestCounts, TestOutcome};

// ─── pytest (json-report plugin) ───────────────────────────────────

#[derive(Debug, Deserialize)]
struct PytestReport {
    #[serde(default)]
    summary: PytestSummary,
    #[serde(default)]
    tests: Vec<PytestTest>,
}

#[derive(Debug, Default, Deserialize)]
struct PytestSummary {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    passed: usize,
    #[serde(default)]
    failed: usize,
}

#[derive(Debug, Deserialize)]
struct PytestTest {
    #[serde(default)]
    nodeid: String,
    #[serde(default)]
    outcome: String,
    #[serde(default)]
    call: Option<PytestCall>,
}

#[derive(Debug, Deserialize)]
struct PytestCall {
    #[serde(default)]
    longrepr: Option<String>,
}

/// Parse a pytest `--json-report` file body.
pub fn parse_pytest_json(raw: &str) -> Option<TestCounts> {
    let report: PytestReport = serde_json::from_str(raw).ok()?;
    let failures = report
        .tests
        .iter()
        .filter(|t| t.outcome == "failed")
        .map(|t| {
            let detail = t
                .call
                .as_ref()
                .and_then(|c| c.longrepr.as_deref())
                .unwrap_or("unknown error");
            let name = if t.nodeid.is_empty() {
                "unknown"
            } else {
                t.nodeid.as_str()
            };
            TestOutcome::failed(name, detail)
        })
        .collect();

    Some(TestCounts {
        tests_run: report.summary.total,
        tests_passed: report.summary.passed,
        tests_failed: report.summary.failed,
        failures,
    })
}

// ─── jest (structured --json output) ───────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestReport {
    #[serde(default)]
    num_total_tests: usize,
    #[serde(default)]
    num_passed_tests: usize,
    #[serde(default)]
    num_failed_tests: usize,
    #[serde(default)]
    test_results: Vec<JestSuiteResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestSuiteResult {
    #[serde(default)]
    assertion_results: Vec<JestAssertion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JestAssertion {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    failure_messages: Vec<String>,
}

/// Parse the JSON report jest writes via `--json --outputFile`.
pub fn parse_jest_json(raw: &str) -> Option<TestCounts> {
    let report: JestReport = serde_json::from_str(raw).ok()?;
    let failures = report
        .test_results
        .iter()
        .flat_map(|suite| &suite.assertion_results)
        .filter(|a| a.status == "failed")
        .map(|a| {
            let name = if a.full_name.is_empty() {
                a.title.as_str()
            } else {
                a.full_name.as_str()
            };
            let detail = if a.failure_messages.is_empty() {
                "unknown error".to_string()
            } else {
                a.failure_messages.join("\n")
            };
            TestOutcome::failed(if name.is_empty() { "unknown" } else { name }, detail)
        })
        .collect();

    Some(TestCounts {
        tests_run: report.num_total_tests,
        tests_passed: report.num_passed_tests,
        tests_failed: report.num_failed_tests,
        failures,
    })
}

// ─── jest (human-readable summary line, fallback only) ─────────────

static JEST_FAILED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) failed").expect("jest failed regex"));
static JEST_PASSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) passed").expect("jest passed regex"));

/// Scan jest's `Tests:` summary line for pass/fail counts.
///
/// An approximation: it names no individual tests and misparses under
/// format changes, so it is used only when no structured report exists.
pub fn parse_jest_stdout(text: &str) -> Option<TestCounts> {
    if !text.contains("Tests:") {
        return None;
    }

    let failed = JEST_FAILED
        .captures(text)
        .and_then(|c| c[1].parse::<usize>().ok())
        .unwrap_or(0);
    let passed = JEST_PASSED
        .captures(text)
        .and_then(|c| c[1].parse::<usize>().ok())
        .unwrap_or(0);

    Some(TestCounts {
        tests_run: passed + failed,
        tests_passed: passed,
        tests_failed: failed,
        failures: Vec::new(),
    })
}

// ─── maven surefire ────────────────────────────────────────────────

static SUREFIRE_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Tests run: (\d+), Failures: (\d+), Errors: (\d+)").expect("surefire regex")
});

/// Scan maven output for the surefire summary
/// `Tests run: R, Failures: F, Errors: E`.
pub fn parse_surefire_stdout(text: &str) -> Option<TestCounts> {
    let caps = SUREFIRE_SUMMARY.captures(text)?;
    let run = caps[1].parse::<usize>().ok()?;
    let failures = caps[2].parse::<usize>().ok()?;
    let errors = caps[3].parse::<usize>().ok()?;

    Some(TestCounts {
        tests_run: run,
        tests_passed: run.saturating_sub(failures + errors),
        tests_failed: failures + errors,
        failures: Vec::new(),
    })
}
