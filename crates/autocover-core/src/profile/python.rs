//! Python profile: pytest runner, pip dependency resolution.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clean;
use crate::error::Result;
use crate::parse;
use crate::process::{check_command, run_command};
use crate::report::ExecutionReport;
use crate::request::ProjectContext;

use super::{
    FileExtensions, LanguageProfile, ProjectLayout, RawTestRun, create_layout, write_file,
};

const REPORT_FILE: &str = "results.json";

pub struct PythonProfile {
    python: String,
    pip: String,
}

impl PythonProfile {
    pub fn new() -> Self {
        Self {
            python: "python3".to_string(),
            pip: "pip".to_string(),
        }
    }

    pub fn with_tools(python: impl Into<String>, pip: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            pip: pip.into(),
        }
    }
}

impl Default for PythonProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageProfile for PythonProfile {
    fn name(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> FileExtensions {
        FileExtensions {
            source: ".py",
            test: ".py",
        }
    }

    fn layout(&self, root: &Path, context: &ProjectContext) -> Result<ProjectLayout> {
        let layout = create_layout(root, context)?;
        // Package markers so `from src.<module> import …` resolves.
        write_file(&layout.source_dir, "__init__.py", "")?;
        write_file(&layout.test_dir, "__init__.py", "")?;
        Ok(layout)
    }

    fn test_filename(&self, filename: &str) -> String {
        if filename.starts_with("test_") {
            filename.to_string()
        } else {
            format!("test_{filename}")
        }
    }

    async fn install_dependencies(&self, root: &Path, deps: &[String], timeout: Duration) -> bool {
        if deps.is_empty() {
            return true;
        }

        if let Err(e) = write_file(root, "requirements.txt", &deps.join("\n")) {
            warn!(error = %e, "failed to write requirements.txt");
            return false;
        }

        match run_command(
            &self.pip,
            &["install", "-r", "requirements.txt"],
            root,
            timeout,
        )
        .await
        {
            Ok(out) => out.success(),
            Err(e) => {
                warn!(error = %e, "pip install could not be spawned");
                false
            }
        }
    }

    async fn run_tests(
        &self,
        root: &Path,
        context: &ProjectContext,
        timeout: Duration,
    ) -> Result<RawTestRun> {
        let report_flag = format!("--json-report-file={REPORT_FILE}");
        let output = run_command(
            &self.python,
            &[
                "-m",
                "pytest",
                context.test_dir(),
                "-v",
                "--tb=short",
                "--json-report",
                &report_flag,
            ],
            root,
            timeout,
        )
        .await?;

        Ok(RawTestRun {
            output,
            report_file: Some(root.join(REPORT_FILE)),
        })
    }

    fn clean_code(&self, code: &str, module: &str) -> String {
        let code = clean::strip_code_fences(code, &["python", "py"]);
        let code = clean::rewrite_src_imports(&code, module);
        clean::ensure_pytest_import(&code).trim().to_string()
    }

    fn normalize(&self, raw: &RawTestRun) -> ExecutionReport {
        let mut report = ExecutionReport::from_process(self.name(), &raw.output);

        let counts = raw
            .report_file
            .as_deref()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|body| parse::parse_pytest_json(&body));

        match counts {
            Some(counts) => report.merge_counts(counts),
            // Report file absent or malformed: counts stay at zero and the
            // exit code alone decides success.
            None => debug!("no pytest json report; keeping zeroed counts"),
        }
        report
    }

    async fn is_available(&self) -> bool {
        check_command(&self.python, &["--version"]).await
    }
}
