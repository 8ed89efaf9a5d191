//! TypeScript profile: jest via ts-jest, npm dependency resolution.

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

pub struct TypeScriptProfile {
    npm: String,
}

impl TypeScriptProfile {
    pub fn new() -> Self {
        Self {
            npm: "npm".to_string(),
        }
    }

    pub fn with_tools(npm: impl Into<String>) -> Self {
        Self { npm: npm.into() }
    }
}

impl Default for TypeScriptProfile {
    fn default() -> Self {
        Self::new()
    }
}

fn package_manifest(deps: &[String]) -> String {
    let mut dev_deps = serde_json::Map::new();
    dev_deps.insert("jest".to_string(), json!("^29.0.0"));
    dev_deps.insert("@types/jest".to_string(), json!("^29.0.0"));
    dev_deps.insert("ts-jest".to_string(), json!("^29.0.0"));
    dev_deps.insert("typescript".to_string(), json!("^5.0.0"));
    for dep in deps {
        dev_deps.insert(dep.clone(), json!("latest"));
    }

    let manifest = json!({
        "name": "autocover-test",
        "version": "1.0.0",
        "scripts": { "test": "jest" },
        "devDependencies": dev_deps,
    });
    serde_json::to_string_pretty(&manifest).expect("package.json serialization")
}

fn compiler_options() -> String {
    serde_json::to_string_pretty(&json!({
        "compilerOptions": {
            "target": "ES2020",
            "module": "commonjs",
            "strict": true,
            "esModuleInterop": true,
        }
    }))
    .expect("tsconfig serialization")
}

fn jest_preset() -> String {
    serde_json::to_string_pretty(&json!({
        "preset": "ts-jest",
        "testEnvironment": "node",
    }))
    .expect("jest config serialization")
}

#[async_trait]
impl LanguageProfile for TypeScriptProfile {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn file_extensions(&self) -> FileExtensions {
        FileExtensions {
            source: ".ts",
            test: ".test.ts",
        }
    }

    fn layout(&self, root: &Path, context: &ProjectContext) -> Result<ProjectLayout> {
        create_layout(root, context)
    }

    fn test_filename(&self, filename: &str) -> String {
        match filename.strip_suffix(".ts") {
            Some(stem) => format!("{stem}.test.ts"),
            None => filename.to_string(),
        }
    }

    async fn install_dependencies(&self, root: &Path, deps: &[String], timeout: Duration) -> bool {
        let artifacts = [
            ("package.json", package_manifest(deps)),
            ("tsconfig.json", compiler_options()),
            ("jest.config.json", jest_preset()),
        ];
        for (name, body) in &artifacts {
            if let Err(e) = write_file(root, name, body) {
                warn!(error = %e, file = name, "failed to write manifest artifact");
                return false;
            }
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
        let output = run_command(&self.npm, &["test"], root, timeout).await?;

        // No structured report requested; normalization falls back to the
        // summary line.
        Ok(RawTestRun {
            output,
            report_file: None,
        })
    }

    fn clean_code(&self, code: &str, _module: &str) -> String {
        clean::strip_code_fences(code, &["typescript", "ts"])
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
