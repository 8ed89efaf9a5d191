use autocover_core::executor::{ExecutorConfig, TestExecutor};
use autocover_core::pipeline::{PipelineState, execution_stage};
use autocover_core::report::{ExecutionReport, TestOutcome};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn missing_generated_tests_short_circuits() {
    let executor = TestExecutor::with_defaults();
    let state = PipelineState::new("def add(): pass", "calc.py");

    let merged = execution_stage(&executor, state).await;
    assert_eq!(merged.build_success, Some(false));
    let report = merged.test_results.unwrap();
    assert!(!report.success);
    assert!(report.error.as_deref().unwrap().contains("no generated tests"));
    assert!(merged.test_failures.is_none());
}

#[tokio::test]
async fn failed_execution_is_merged_into_state() {
    let base = tempfile::tempdir().unwrap();
    let config = ExecutorConfig::builder()
        .sandbox_root(base.path())
        .tool("python", "autocover-missing-python-binary")
        .build();
    let executor = TestExecutor::new(config);

    let mut state = PipelineState::new("def add(a, b):\n    return a + b", "calc.py");
    state.generated_tests = Some("def test_add():\n    assert True".to_string());

    let merged = execution_stage(&executor, state).await;
    assert_eq!(merged.build_success, Some(false));
    assert!(merged.test_failures.is_none());
    let report = merged.test_results.unwrap();
    assert_eq!(report.language, "python");
    assert!(report.error.is_some());
    // The input fields survive the merge for the next stage.
    assert_eq!(merged.file_path, "calc.py");
    assert!(merged.generated_tests.is_some());
}

#[test]
fn failures_flatten_to_name_and_message() {
    let mut report = ExecutionReport::failed("python", "tests failed");
    report.failures = vec![
        TestOutcome::failed("tests/test_calc.py::test_mul", "assert 6 == 7"),
        TestOutcome {
            test_name: "tests/test_calc.py::test_div".to_string(),
            passed: false,
            error_message: None,
            traceback: None,
        },
    ];

    let flat = report.flattened_failures();
    assert_eq!(flat.len(), 2);
    assert_eq!(flat[0], "tests/test_calc.py::test_mul: assert 6 == 7");
    assert_eq!(flat[1], "tests/test_calc.py::test_div: unknown error");
}

#[test]
fn state_round_trips_through_json_with_extra_context() {
    let raw = r#"{
        "source_code": "def add(a, b): return a + b",
        "file_path": "calc.py",
        "project_context": {
            "language": "python",
            "build_tool": "pip",
            "framework_hint": "pytest"
        },
        "dependencies": ["pytest"],
        "target_functions": [
            {"name": "add", "signature": "add(a, b)", "line": 1}
        ],
        "generated_tests": "def test_add(): assert True"
    }"#;

    let state: PipelineState = serde_json::from_str(raw).unwrap();
    assert_eq!(state.project_context.language.as_deref(), Some("python"));
    assert_eq!(state.target_functions.len(), 1);
    assert_eq!(state.target_functions[0].name, "add");
    // Unrecognized context keys are preserved verbatim.
    assert_eq!(
        state.project_context.extra.get("framework_hint").unwrap(),
        "pytest"
    );

    let json = serde_json::to_string(&state).unwrap();
    let back: PipelineState = serde_json::from_str(&json).unwrap();
    assert_eq!(
        back.project_context.extra.get("framework_hint").unwrap(),
        "pytest"
    );
    assert!(back.build_success.is_none());
}
