//! Execution request — the immutable input to one test-execution attempt.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-supplied metadata describing the target project's declared
/// language and directory conventions.
///
/// All fields are optional; unrecognized keys supplied by the surrounding
/// pipeline are preserved in `extra` and round-tripped untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ProjectContext {
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Default::default()
        }
    }

    /// Source directory name, defaulting to `src`.
    pub fn source_dir(&self) -> &str {
        self.source_directory.as_deref().unwrap_or("src")
    }

    /// Test directory name, defaulting to `tests`.
    pub fn test_dir(&self) -> &str {
        self.test_directory.as_deref().unwrap_or("tests")
    }
}

/// One unit of work for the executor: a source file, a candidate test file,
/// and enough context to materialize a runnable project around them.
///
/// The executor only reads the request; ownership stays with the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub test_code: String,
    /// Path of the file under test in the caller's project. Only the file
    /// name (and its extension) matter to the executor.
    pub file_path: String,
    #[serde(default)]
    pub project_context: ProjectContext,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ExecutionRequest {
    pub fn new(
        source_code: impl Into<String>,
        test_code: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            test_code: test_code.into(),
            file_path: file_path.into(),
            project_context: ProjectContext::default(),
            dependencies: Vec::new(),
        }
    }

    pub fn context(mut self, context: ProjectContext) -> Self {
        self.project_context = context;
        self
    }

    pub fn dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies = deps;
        self
    }
}
