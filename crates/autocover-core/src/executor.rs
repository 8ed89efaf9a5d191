//! Execution orchestrator — the single entry point the pipeline consumes.
//!
//! Composes profile selection, sandbox lifecycle, code normalization,
//! dependency resolution, test running, and result normalization into one
//! strictly linear attempt. Every failure is converted into a degraded
//! [`ExecutionReport`] at this boundary; the sandbox is destroyed on every
//! path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{AutocoverError, Result};
use crate::profile::{
    JavaProfile, JavaScriptProfile, LanguageProfile, PythonProfile, TypeScriptProfile,
    language_for_extension,
};
use crate::report::ExecutionReport;
use crate::request::{ExecutionRequest, ProjectContext};
use crate::sandbox::Sandbox;

/// Configuration for the executor — an explicit object threaded through
/// construction; nothing here is read from process-global state at call
/// time.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub python: bool,
    pub javascript: bool,
    pub typescript: bool,
    pub java: bool,
    /// Bound on the package-manager step.
    pub install_timeout: Duration,
    /// Bound on the test-runner step.
    pub test_timeout: Duration,
    /// Base directory for sandboxes; the system temp directory when unset.
    pub sandbox_root: Option<PathBuf>,
    /// Leave sandbox directories on disk for inspection. Debugging only.
    pub keep_sandboxes: bool,
    /// Tool-path overrides (e.g., "python" → "/usr/local/bin/python3.12",
    /// "pip", "npm", "mvn").
    pub tools: HashMap<String, String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            python: true,
            javascript: true,
            typescript: true,
            java: true,
            install_timeout: Duration::from_secs(300),
            test_timeout: Duration::from_secs(120),
            sandbox_root: None,
            keep_sandboxes: false,
            tools: HashMap::new(),
        }
    }
}

impl ExecutorConfig {
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }
}

/// Builder for [`ExecutorConfig`].
#[derive(Debug, Default)]
pub struct ExecutorConfigBuilder {
    python: Option<bool>,
    javascript: Option<bool>,
    typescript: Option<bool>,
    java: Option<bool>,
    install_timeout_secs: Option<u64>,
    test_timeout_secs: Option<u64>,
    sandbox_root: Option<PathBuf>,
    keep_sandboxes: bool,
    tools: HashMap<String, String>,
}

impl ExecutorConfigBuilder {
    pub fn python(mut self, enabled: bool) -> Self {
        self.python = Some(enabled);
        self
    }

    pub fn javascript(mut self, enabled: bool) -> Self {
        self.javascript = Some(enabled);
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = Some(enabled);
        self
    }

    pub fn java(mut self, enabled: bool) -> Self {
        self.java = Some(enabled);
        self
    }

    pub fn install_timeout_secs(mut self, secs: u64) -> Self {
        self.install_timeout_secs = Some(secs);
        self
    }

    pub fn test_timeout_secs(mut self, secs: u64) -> Self {
        self.test_timeout_secs = Some(secs);
        self
    }

    pub fn sandbox_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sandbox_root = Some(root.into());
        self
    }

    pub fn keep_sandboxes(mut self, keep: bool) -> Self {
        self.keep_sandboxes = keep;
        self
    }

    pub fn tool(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.tools.insert(name.into(), path.into());
        self
    }

    pub fn build(self) -> ExecutorConfig {
        ExecutorConfig {
            python: self.python.unwrap_or(true),
            javascript: self.javascript.unwrap_or(true),
            typescript: self.typescript.unwrap_or(true),
            java: self.java.unwrap_or(true),
            install_timeout: Duration::from_secs(self.install_timeout_secs.unwrap_or(300)),
            test_timeout: Duration::from_secs(self.test_timeout_secs.unwrap_or(120)),
            sandbox_root: self.sandbox_root,
            keep_sandboxes: self.keep_sandboxes,
            tools: self.tools,
        }
    }
}

/// Language-agnostic test executor.
///
/// Holds no per-attempt state: `execute` takes `&self`, so independent
/// callers may run attempts concurrently; isolation comes from each
/// attempt's uniquely-named sandbox.
pub struct TestExecutor {
    profiles: Vec<(String, Arc<dyn LanguageProfile>)>,
    config: ExecutorConfig,
}

impl TestExecutor {
    /// Instantiate the enabled profiles, applying tool-path overrides.
    pub fn new(config: ExecutorConfig) -> Self {
        let tool = |name: &str, default: &str| -> String {
            config
                .tools
                .get(name)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        let mut profiles: Vec<(String, Arc<dyn LanguageProfile>)> = Vec::new();
        if config.python {
            profiles.push((
                "python".to_string(),
                Arc::new(PythonProfile::with_tools(
                    tool("python", "python3"),
                    tool("pip", "pip"),
                )),
            ));
        }
        if config.javascript {
            profiles.push((
                "javascript".to_string(),
                Arc::new(JavaScriptProfile::with_tools(tool("npm", "npm"))),
            ));
        }
        if config.typescript {
            profiles.push((
                "typescript".to_string(),
                Arc::new(TypeScriptProfile::with_tools(tool("npm", "npm"))),
            ));
        }
        if config.java {
            profiles.push((
                "java".to_string(),
                Arc::new(JavaProfile::with_tools(tool("mvn", "mvn"))),
            ));
        }

        Self { profiles, config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ExecutorConfig::default())
    }

    /// Register a custom profile under its own language key.
    pub fn add_profile(&mut self, profile: Arc<dyn LanguageProfile>) {
        self.profiles.push((profile.name().to_string(), profile));
    }

    pub fn profile(&self, language: &str) -> Option<&Arc<dyn LanguageProfile>> {
        self.profiles
            .iter()
            .find(|(name, _)| name == language)
            .map(|(_, p)| p)
    }

    pub fn supported_languages(&self) -> Vec<&str> {
        self.profiles.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Which registered profiles have their toolchain actually installed.
    pub async fn available_languages(&self) -> Vec<String> {
        let mut available = Vec::new();
        for (name, profile) in &self.profiles {
            if profile.is_available().await {
                available.push(name.clone());
            }
        }
        available
    }

    /// Resolve the target language: an explicitly declared language wins
    /// when it names a supported profile; otherwise the file extension is
    /// mapped through a fixed table; otherwise python.
    pub fn detect_language(&self, context: &ProjectContext, file_path: &str) -> String {
        if let Some(declared) = &context.language {
            let declared = declared.to_lowercase();
            if self.profile(&declared).is_some() {
                return declared;
            }
        }

        Path::new(file_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| language_for_extension(&e))
            .unwrap_or("python")
            .to_string()
    }

    /// Run one execution attempt. Always returns a report, never an error:
    /// every failure kind degrades into report fields, and the sandbox is
    /// destroyed before returning on every path.
    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionReport {
        let started = Instant::now();
        let language = self.detect_language(&request.project_context, &request.file_path);

        let profile = match self.resolve_profile(&language) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(language = %language, "no profile for detected language");
                let mut report = ExecutionReport::failed(language.as_str(), e.to_string());
                report.duration_ms = started.elapsed().as_millis() as u64;
                return report;
            }
        };

        info!(language = %language, file = %request.file_path, "starting test execution");

        let sandbox = match Sandbox::create(
            &format!("autocover_{language}_"),
            self.config.sandbox_root.as_deref(),
            self.config.keep_sandboxes,
        ) {
            Ok(sandbox) => sandbox,
            Err(e) => {
                let mut report = ExecutionReport::failed(
                    language.as_str(),
                    format!("sandbox setup failed: {e}"),
                );
                report.duration_ms = started.elapsed().as_millis() as u64;
                return report;
            }
        };

        let mut report = match self
            .run_attempt(profile.as_ref(), &sandbox, request)
            .await
        {
            Ok(report) => report,
            Err(e) => ExecutionReport::failed(language.as_str(), format!("execution failed: {e}")),
        };
        report.language = language.clone();
        report.duration_ms = started.elapsed().as_millis() as u64;

        if let Err(e) = sandbox.cleanup() {
            warn!(language = %language, error = %e, "sandbox cleanup failed");
        }

        info!(
            language = %language,
            success = report.success,
            tests_run = report.tests_run,
            tests_failed = report.tests_failed,
            "test execution finished"
        );
        report
    }

    fn resolve_profile(&self, language: &str) -> Result<Arc<dyn LanguageProfile>> {
        self.profile(language)
            .cloned()
            .ok_or_else(|| AutocoverError::unsupported_language(language))
    }

    async fn run_attempt(
        &self,
        profile: &dyn LanguageProfile,
        sandbox: &Sandbox,
        request: &ExecutionRequest,
    ) -> Result<ExecutionReport> {
        let layout = profile.layout(sandbox.root(), &request.project_context)?;

        let filename = source_filename(&request.file_path, profile.file_extensions().source);
        let module = module_name(&filename);
        debug!(filename = %filename, module = %module, "materializing sandbox files");

        let source = if request.source_code.is_empty() {
            request.source_code.clone()
        } else {
            profile.clean_code(&request.source_code, &module)
        };
        let test = profile.clean_code(&request.test_code, &module);

        profile.write_source(&layout.source_dir, &source, &filename)?;
        profile.write_test(&layout.test_dir, &test, &filename)?;

        let dependencies_installed = profile
            .install_dependencies(
                sandbox.root(),
                &request.dependencies,
                self.config.install_timeout,
            )
            .await;
        if !dependencies_installed {
            // Non-fatal: the tests are still attempted without the
            // declared dependencies.
            warn!("dependency installation failed; running tests anyway");
        }

        let raw = profile
            .run_tests(
                sandbox.root(),
                &request.project_context,
                self.config.test_timeout,
            )
            .await?;

        let mut report = profile.normalize(&raw);
        report.dependencies_installed = dependencies_installed;
        Ok(report)
    }
}

/// File name for the source file inside the sandbox: the request's file
/// name, with the profile's source extension appended when missing.
fn source_filename(file_path: &str, source_ext: &str) -> String {
    let name = Path::new(file_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_path);
    if name.ends_with(source_ext) {
        name.to_string()
    } else {
        format!("{name}{source_ext}")
    }
}

/// Module stem used for deterministic import repair.
fn module_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_filename_appends_extension() {
        assert_eq!(source_filename("calculator", ".py"), "calculator.py");
        assert_eq!(source_filename("calculator.py", ".py"), "calculator.py");
        assert_eq!(
            source_filename("some/dir/calculator.js", ".js"),
            "calculator.js"
        );
    }

    #[test]
    fn module_name_is_the_stem() {
        assert_eq!(module_name("calculator.py"), "calculator");
        assert_eq!(module_name("calculator.test.js"), "calculator.test");
    }
}
