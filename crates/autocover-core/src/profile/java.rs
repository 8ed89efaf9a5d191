//! Java profile: maven build with junit-jupiter and surefire.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::clean;
use crate::error::{AutocoverError, Result};
use crate::parse;
use crate::process::{check_command, run_command};
use crate::report::ExecutionReport;
use crate::request::ProjectContext;

use super::{FileExtensions, LanguageProfile, ProjectLayout, RawTestRun, write_file};

pub struct JavaProfile {
    mvn: String,
}

impl JavaProfile {
    pub fn new() -> Self {
        Self {
            mvn: "mvn".to_string(),
        }
    }

    pub fn with_tools(mvn: impl Into<String>) -> Self {
        Self { mvn: mvn.into() }
    }
}

impl Default for JavaProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Build descriptor declaring junit-jupiter, the surefire plugin, and any
/// caller dependencies given as `group:artifact:version` coordinates.
fn build_descriptor(deps: &[String]) -> String {
    let mut extra = String::new();
    for dep in deps {
        let mut parts = dep.splitn(3, ':');
        if let (Some(group), Some(artifact), Some(version)) =
            (parts.next(), parts.next(), parts.next())
        {
            extra.push_str(&format!(
                r#"        <dependency>
            <groupId>{group}</groupId>
            <artifactId>{artifact}</artifactId>
            <version>{version}</version>
        </dependency>
"#
            ));
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0
                             http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.autocover</groupId>
    <artifactId>test-project</artifactId>
    <version>1.0.0</version>

    <properties>
        <maven.compiler.source>11</maven.compiler.source>
        <maven.compiler.target>11</maven.compiler.target>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.junit.jupiter</groupId>
            <artifactId>junit-jupiter</artifactId>
            <version>5.9.0</version>
            <scope>test</scope>
        </dependency>
{extra}    </dependencies>

    <build>
        <plugins>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-surefire-plugin</artifactId>
                <version>3.0.0-M7</version>
            </plugin>
        </plugins>
    </build>
</project>
"#
    )
}

#[async_trait]
impl LanguageProfile for JavaProfile {
    fn name(&self) -> &'static str {
        "java"
    }

    fn file_extensions(&self) -> FileExtensions {
        FileExtensions {
            source: ".java",
            test: ".java",
        }
    }

    /// Standard Maven layout; the project context's directory overrides do
    /// not apply here, the build tool dictates the convention.
    fn layout(&self, root: &Path, _context: &ProjectContext) -> Result<ProjectLayout> {
        let source_dir = root.join("src").join("main").join("java");
        let test_dir = root.join("src").join("test").join("java");
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

    fn test_filename(&self, filename: &str) -> String {
        match filename.strip_suffix(".java") {
            Some(stem) => format!("{stem}Test.java"),
            None => filename.to_string(),
        }
    }

    async fn install_dependencies(&self, root: &Path, deps: &[String], timeout: Duration) -> bool {
        if let Err(e) = write_file(root, "pom.xml", &build_descriptor(deps)) {
            warn!(error = %e, "failed to write pom.xml");
            return false;
        }

        match run_command(&self.mvn, &["dependency:resolve"], root, timeout).await {
            Ok(out) => out.success(),
            Err(e) => {
                warn!(error = %e, "mvn dependency:resolve could not be spawned");
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
        let output = run_command(&self.mvn, &["test"], root, timeout).await?;
        Ok(RawTestRun {
            output,
            report_file: None,
        })
    }

    fn clean_code(&self, code: &str, _module: &str) -> String {
        clean::strip_code_fences(code, &["java"]).trim().to_string()
    }

    fn normalize(&self, raw: &RawTestRun) -> ExecutionReport {
        let mut report = ExecutionReport::from_process(self.name(), &raw.output);
        if let Some(counts) = parse::parse_surefire_stdout(&raw.output.stdout) {
            report.merge_counts(counts);
        }
        report
    }

    async fn is_available(&self) -> bool {
        check_command(&self.mvn, &["--version"]).await
    }
}
