//! Canonical, language-independent test-run reports.

use serde::{Deserialize, Serialize};

use crate::process::ProcessOutput;

/// One failing test discovered while normalizing runner output.
///
/// Passing tests are only counted, not individually recorded — framework
/// stdout rarely names them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    pub test_name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl TestOutcome {
    pub fn failed(test_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            passed: false,
            error_message: Some(error_message.into()),
            traceback: None,
        }
    }
}

/// Counts and per-failure detail recovered from one runner's output.
///
/// Produced by the normalizers in [`crate::parse`]; `None` from a parser
/// means "no recognizable report", in which case the counts in the final
/// [`ExecutionReport`] stay at zero.
#[derive(Debug, Clone, Default)]
pub struct TestCounts {
    pub tests_run: usize,
    pub tests_passed: usize,
    pub tests_failed: usize,
    pub failures: Vec<TestOutcome>,
}

/// The only artifact an execution attempt returns to the caller.
///
/// A report is always produced, never an error: when the runner crashes or
/// its output is unparseable the report degrades (zero counts, `success =
/// false`, `error`/`stderr` carrying the diagnostic) but still exists.
/// When parsing succeeds fully, `tests_run == tests_passed + tests_failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub tests_run: usize,
    #[serde(default)]
    pub tests_passed: usize,
    #[serde(default)]
    pub tests_failed: usize,
    #[serde(default)]
    pub failures: Vec<TestOutcome>,
    #[serde(default)]
    pub dependencies_installed: bool,
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl ExecutionReport {
    /// A degraded report for an attempt that never produced runner output.
    pub fn failed(language: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            return_code: None,
            stdout: String::new(),
            stderr: String::new(),
            tests_run: 0,
            tests_passed: 0,
            tests_failed: 0,
            failures: Vec::new(),
            dependencies_installed: false,
            language: language.into(),
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    /// Base report for a completed runner process, before any parsing.
    pub fn from_process(language: impl Into<String>, output: &ProcessOutput) -> Self {
        Self {
            success: output.success(),
            return_code: Some(output.exit_code),
            stdout: output.stdout.clone(),
            stderr: output.stderr.clone(),
            tests_run: 0,
            tests_passed: 0,
            tests_failed: 0,
            failures: Vec::new(),
            dependencies_installed: false,
            language: language.into(),
            error: output
                .timed_out
                .then(|| "test runner timed out".to_string()),
            duration_ms: 0,
        }
    }

    /// Fold normalized counts into the report.
    pub fn merge_counts(&mut self, counts: TestCounts) {
        self.tests_run = counts.tests_run;
        self.tests_passed = counts.tests_passed;
        self.tests_failed = counts.tests_failed;
        self.failures = counts.failures;
    }

    /// Whether the parsed counts are internally consistent.
    pub fn counts_consistent(&self) -> bool {
        self.tests_run == self.tests_passed + self.tests_failed
    }

    /// Failures flattened to `"test_name: error_message"` strings — the
    /// shape the downstream fix/retry collaborator consumes.
    pub fn flattened_failures(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| {
                format!(
                    "{}: {}",
                    f.test_name,
                    f.error_message.as_deref().unwrap_or("unknown error")
                )
            })
            .collect()
    }
}
