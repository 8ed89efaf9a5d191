//! Declarative executor configuration from JSON/TOML/YAML files.
//!
//! Lets a deployment describe the executor (enabled languages, timeouts,
//! tool paths) in a config file instead of code; the result resolves into
//! an [`ExecutorConfig`](crate::executor::ExecutorConfig).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{self, AutocoverError};
use crate::executor::ExecutorConfig;

/// Top-level executor configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorFileConfig {
    /// Languages to enable; all supported languages when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default = "default_install_timeout_secs")]
    pub install_timeout_secs: u64,
    #[serde(default = "default_test_timeout_secs")]
    pub test_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_root: Option<String>,
    #[serde(default)]
    pub keep_sandboxes: bool,
    /// Tool-path overrides, e.g. `python = "/usr/bin/python3.12"`.
    #[serde(default)]
    pub tools: HashMap<String, String>,
}

fn default_install_timeout_secs() -> u64 {
    300
}

fn default_test_timeout_secs() -> u64 {
    120
}

impl Default for ExecutorFileConfig {
    fn default() -> Self {
        Self {
            languages: None,
            install_timeout_secs: default_install_timeout_secs(),
            test_timeout_secs: default_test_timeout_secs(),
            sandbox_root: None,
            keep_sandboxes: false,
            tools: HashMap::new(),
        }
    }
}

impl ExecutorFileConfig {
    /// Parse from JSON string.
    pub fn from_json(json: &str) -> error::Result<Self> {
        serde_json::from_str(json).map_err(|e| AutocoverError::Config {
            message: format!("Invalid JSON config: {e}"),
        })
    }

    /// Parse from TOML string.
    #[cfg(feature = "config-toml")]
    pub fn from_toml(toml: &str) -> error::Result<Self> {
        toml::from_str(toml).map_err(|e| AutocoverError::Config {
            message: format!("Invalid TOML config: {e}"),
        })
    }

    /// Parse from YAML string.
    #[cfg(feature = "config-yaml")]
    pub fn from_yaml(yaml: &str) -> error::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AutocoverError::Config {
            message: format!("Invalid YAML config: {e}"),
        })
    }

    /// Detect format from file extension and parse.
    pub fn from_file(path: &str) -> error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AutocoverError::Config {
            message: format!("Failed to read config file '{path}': {e}"),
        })?;

        if path.ends_with(".json") {
            return Self::from_json(&content);
        }
        #[cfg(feature = "config-toml")]
        if path.ends_with(".toml") {
            return Self::from_toml(&content);
        }
        #[cfg(feature = "config-yaml")]
        if path.ends_with(".yaml") || path.ends_with(".yml") {
            return Self::from_yaml(&content);
        }
        // Default: try JSON
        Self::from_json(&content)
    }

    /// Resolve into the runtime configuration.
    pub fn resolve(&self) -> ExecutorConfig {
        let enabled = |lang: &str| -> bool {
            self.languages
                .as_ref()
                .map(|list| list.iter().any(|l| l.eq_ignore_ascii_case(lang)))
                .unwrap_or(true)
        };

        let mut builder = ExecutorConfig::builder()
            .python(enabled("python"))
            .javascript(enabled("javascript"))
            .typescript(enabled("typescript"))
            .java(enabled("java"))
            .install_timeout_secs(self.install_timeout_secs)
            .test_timeout_secs(self.test_timeout_secs)
            .keep_sandboxes(self.keep_sandboxes);

        if let Some(ref root) = self.sandbox_root {
            builder = builder.sandbox_root(root);
        }
        for (name, path) in &self.tools {
            builder = builder.tool(name.clone(), path.clone());
        }
        builder.build()
    }
}
