//! Boundary contract with the surrounding generation pipeline.
//!
//! The scaffolder (static analysis) and generator (LLM) collaborators are
//! external; this module only defines the shared state they hand over and
//! the single execution stage they invoke. `target_functions` metadata is
//! carried through untouched — it is never re-derived here.

use serde::{Deserialize, Serialize};

use crate::executor::TestExecutor;
use crate::report::ExecutionReport;
use crate::request::{ExecutionRequest, ProjectContext};

/// Function metadata extracted by the external scaffolder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetFunction {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Shared pipeline state, as handed over by the generation stage and
/// returned to the fix/retry stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub source_code: String,
    pub file_path: String,
    #[serde(default)]
    pub project_context: ProjectContext,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub target_functions: Vec<TargetFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_tests: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_results: Option<ExecutionReport>,
    /// Flattened `"test_name: error_message"` strings for the fixer;
    /// `None` is the explicit "no failures" marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_failures: Option<Vec<String>>,
}

impl PipelineState {
    pub fn new(source_code: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            file_path: file_path.into(),
            project_context: ProjectContext::default(),
            dependencies: Vec::new(),
            target_functions: Vec::new(),
            generated_tests: None,
            build_success: None,
            test_results: None,
            test_failures: None,
        }
    }
}

/// The execution stage of the pipeline: run the generated tests once and
/// merge the outcome back into the state.
///
/// Missing `generated_tests` short-circuits into a failed state without
/// touching the filesystem.
pub async fn execution_stage(executor: &TestExecutor, mut state: PipelineState) -> PipelineState {
    let Some(test_code) = state.generated_tests.clone() else {
        let language =
            executor.detect_language(&state.project_context, &state.file_path);
        state.build_success = Some(false);
        state.test_results = Some(ExecutionReport::failed(
            language,
            "no generated tests to execute",
        ));
        state.test_failures = None;
        return state;
    };

    let request = ExecutionRequest {
        source_code: state.source_code.clone(),
        test_code,
        file_path: state.file_path.clone(),
        project_context: state.project_context.clone(),
        dependencies: state.dependencies.clone(),
    };

    let report = executor.execute(&request).await;

    state.build_success = Some(report.success);
    let failures = report.flattened_failures();
    state.test_failures = if failures.is_empty() {
        None
    } else {
        Some(failures)
    };
    state.test_results = Some(report);
    state
}
