//! Language profiles — per-language conventions and capability operations.
//!
//! A profile knows how to materialize a runnable project for its language
//! inside a sandbox: directory layout, file naming, manifest synthesis,
//! package-manager and test-runner invocation, and normalization of the
//! runner's output into the canonical report. Profiles form a closed set
//! dispatched by an explicit language-key registry; adding a language
//! means one module here plus one registry entry in the executor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AutocoverError, Result};
use crate::parse;
use crate::process::ProcessOutput;
use crate::report::ExecutionReport;
use crate::request::ProjectContext;

pub mod java;
pub mod javascript;
pub mod python;
pub mod typescript;

pub use java::JavaProfile;
pub use javascript::JavaScriptProfile;
pub use python::PythonProfile;
pub use typescript::TypeScriptProfile;

/// Literal file-extension strings for a language.
#[derive(Debug, Clone, Copy)]
pub struct FileExtensions {
    pub source: &'static str,
    pub test: &'static str,
}

/// On-disk directory convention created inside a sandbox.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub source_dir: PathBuf,
    pub test_dir: PathBuf,
}

/// Unparsed result of one test-runner invocation: the raw process output
/// plus the structured report file the runner was asked to write, if any.
#[derive(Debug)]
pub struct RawTestRun {
    pub output: ProcessOutput,
    pub report_file: Option<PathBuf>,
}

/// Capability set implemented once per supported language.
#[async_trait]
pub trait LanguageProfile: Send + Sync {
    /// Registry key (`"python"`, `"javascript"`, …).
    fn name(&self) -> &'static str;

    fn file_extensions(&self) -> FileExtensions;

    /// Create the language's directory convention under `root`. Idempotent;
    /// creates parent directories.
    fn layout(&self, root: &Path, context: &ProjectContext) -> Result<ProjectLayout>;

    /// Deterministic test-file name for a given source file name.
    fn test_filename(&self, filename: &str) -> String;

    /// Write the source file verbatim.
    fn write_source(&self, dir: &Path, code: &str, filename: &str) -> Result<PathBuf> {
        write_file(dir, filename, code)
    }

    /// Write the test file verbatim, under the language's test-file name.
    fn write_test(&self, dir: &Path, code: &str, filename: &str) -> Result<PathBuf> {
        write_file(dir, &self.test_filename(filename), code)
    }

    /// Synthesize the language's manifest from `deps` and invoke the
    /// package manager. Never raises: spawn failures, timeouts, and
    /// nonzero exits all come back as `false`.
    async fn install_dependencies(&self, root: &Path, deps: &[String], timeout: Duration) -> bool;

    /// Invoke the native test runner, requesting machine-readable output
    /// where the framework supports it. `Err` only on spawn failure.
    async fn run_tests(
        &self,
        root: &Path,
        context: &ProjectContext,
        timeout: Duration,
    ) -> Result<RawTestRun>;

    /// Strip generation artifacts (fence markers, wrong import paths) from
    /// raw generated text. Idempotent. `module` is the source-file stem,
    /// so import repair is deterministic given the source filename.
    fn clean_code(&self, code: &str, module: &str) -> String;

    /// Normalize a raw run into the canonical report (counts and failures;
    /// the orchestrator attaches language and dependency status).
    fn normalize(&self, raw: &RawTestRun) -> ExecutionReport;

    /// Probe whether the language's toolchain is installed.
    async fn is_available(&self) -> bool;
}

/// Fixed extension → language table used when no language is declared.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "py" => Some("python"),
        "js" => Some("javascript"),
        "ts" => Some("typescript"),
        "java" => Some("java"),
        _ => None,
    }
}

pub(crate) fn write_file(dir: &Path, filename: &str, code: &str) -> Result<PathBuf> {
    let path = dir.join(filename);
    std::fs::write(&path, code).map_err(|e| {
        AutocoverError::sandbox_io(format!("failed to write {}", path.display()), e)
    })?;
    Ok(path)
}

pub(crate) fn create_layout(root: &Path, context: &ProjectContext) -> Result<ProjectLayout> {
    let source_dir = root.join(context.source_dir());
    let test_dir = root.join(context.test_dir());
    for dir in [&source_dir, &test_dir] {
        std::fs::create_dir_all(dir).map_err(|e| {
            AutocoverError::sandbox_io(format!("failed to create {}", dir.display()), e)
        })?;
    }
    Ok(ProjectLayout {
        source_dir,
        test_dir,
    })
}

/// Shared jest normalization for the JavaScript and TypeScript profiles:
/// prefer the structured report file when one was requested and is
/// parseable, then fall back to the summary line in stdout, then stderr
/// (jest writes its human-readable summary to stderr).
pub(crate) fn normalize_jest_run(language: &str, raw: &RawTestRun) -> ExecutionReport {
    let mut report = ExecutionReport::from_process(language, &raw.output);

    let from_file = raw
        .report_file
        .as_deref()
        .and_then(|p| std::fs::read_to_string(p).ok())
        .and_then(|body| parse::parse_jest_json(&body));

    let counts = from_file
        .or_else(|| parse::parse_jest_stdout(&raw.output.stdout))
        .or_else(|| parse::parse_jest_stdout(&raw.output.stderr));

    match counts {
        Some(counts) => report.merge_counts(counts),
        None => debug!(language, "no recognizable jest output; keeping zeroed counts"),
    }
    report
}
