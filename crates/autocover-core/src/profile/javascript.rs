//! JavaScript profile: jest runner, npm dependency resolution.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::clean;
use crate::error::Result;
use crate::process::{check_command, run_command};
use crate::report::ExecutionReport;
use crate::request::ProjectContext;

use super::{
    FileExtensions, LanguageProfile, ProjectLayout, RawTestRun, create_layout, normalize_jest_run,
    write_file,
};

const REPORT_FILE: &str = "results.json";

pub struct JavaScriptProfile {
    npm: String,
}

impl JavaScriptProfile {
    pub fn new() -> Self {
        Self {
            npm: "npm".to_string(),
        }
    }

    pub fn with_tools(npm: impl Into<String>) -> Self {
        Self { npm: npm.into() }
    }
}

impl Default for JavaScriptProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// `package.json` declaring jest plus the caller's dependencies.
fn package_manifest(deps: &[String]) -> String {
    let mut dev_deps = serde_json::Map::new();
    dev_deps.insert("jest".to_string(), json!("^29.0.0"));
    for dep in deps {
        dev_deps.insert(dep.clone(), json!("latest"));
    }

    let manifest = json!({
        "name": "autocover-test",
        "version": "1.0.0",
        "scripts": { "test": "jest" },
        "dependencies": {},
        "devDependencies": dev_deps,
    });
    serde_json::to_string_pretty(&manifest).expect("package.json serialization")
}

#[async_trait]
impl LanguageProfile for JavaScriptProfile {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn file_extensions(&self) -> FileExtensions {
        FileExtensions {
            source: ".js",
            test: ".test.js",
        }
    }

    fn layout(&self, root: &Path, context: &ProjectContext) -> Result<ProjectLayout> {
        create_layout(root, context)
    }

    fn test_filename(&self, filename: &str) -> String {
        match filename.strip_suffix(".js") {
            Some(stem) => format!("{stem}.test.js"),
            None => filename.to_string(),
        }
    }

    async fn install_dependencies(&self, root: &Path, deps: &[String], timeout: Duration) -> bool {
        // The test framework itself is a dependency, so the manifest is
        // synthesized even when the caller declared none.
        if let Err(e) = write_file(root, "package.json", &package_manifest(deps)) {
            warn!(error = %e, "failed to write package.json");
            return false;
        }

        match run_command(&self.npm, &["install"], root, timeout).await {
            Ok(out) => out.success(),
            Err(e) => {
                warn!(error = %e, "npm install could not be spawned");
                false
            }
        }
    }

    async fn run_tests(
        &self,
        root: &Path,
        _context: &ProjectContext,
        timeout: Duration,
    ) -> Result<RawTestRun> {
        let output_flag = format!("--outputFile={REPORT_FILE}");
        let output = run_command(
            &self.npm,
            &["test", "--", "--json", &output_flag],
            root,
            timeout,
        )
        .await?;

        Ok(RawTestRun {
            output,
            report_file: Some(root.join(REPORT_FILE)),
        })
    }

    fn clean_code(&self, code: &str, _module: &str) -> String {
        clean::strip_code_fences(code, &["javascript", "js"])
            .trim()
            .to_string()
    }

    fn normalize(&self, raw: &RawTestRun) -> ExecutionReport {
        normalize_jest_run(self.name(), raw)
    }

    async fn is_available(&self) -> bool {
        check_command(&self.npm, &["--version"]).await
    }
}
