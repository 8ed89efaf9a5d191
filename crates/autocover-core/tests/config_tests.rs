use autocover_core::config::ExecutorFileConfig;
use autocover_core::executor::TestExecutor;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn defaults_enable_every_language() {
    let config = ExecutorFileConfig::default().resolve();
    assert!(config.python && config.javascript && config.typescript && config.java);
    assert_eq!(config.install_timeout, Duration::from_secs(300));
    assert_eq!(config.test_timeout, Duration::from_secs(120));
    assert!(config.sandbox_root.is_none());
    assert!(!config.keep_sandboxes);
}

#[test]
fn json_config_restricts_languages() {
    let doc = ExecutorFileConfig::from_json(
        r#"{
            "languages": ["python", "Java"],
            "test_timeout_secs": 30,
            "tools": {"python": "/usr/local/bin/python3.12"}
        }"#,
    )
    .unwrap();
    let config = doc.resolve();

    assert!(config.python);
    assert!(config.java);
    assert!(!config.javascript);
    assert!(!config.typescript);
    assert_eq!(config.test_timeout, Duration::from_secs(30));
    assert_eq!(config.install_timeout, Duration::from_secs(300));
    assert_eq!(
        config.tools.get("python").map(String::as_str),
        Some("/usr/local/bin/python3.12")
    );

    let executor = TestExecutor::new(config);
    let mut supported = executor.supported_languages();
    supported.sort();
    assert_eq!(supported, vec!["java", "python"]);
}

#[test]
fn invalid_json_is_a_config_error() {
    let err = ExecutorFileConfig::from_json("{ languages: oops }").unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn missing_file_is_a_config_error() {
    assert!(ExecutorFileConfig::from_file("/nonexistent/autocover.json").is_err());
}

#[cfg(feature = "config-toml")]
#[test]
fn toml_config_parses() {
    let doc = ExecutorFileConfig::from_toml(
        r#"
languages = ["javascript"]
install_timeout_secs = 60
keep_sandboxes = true

[tools]
npm = "/opt/node/bin/npm"
"#,
    )
    .unwrap();
    let config = doc.resolve();
    assert!(config.javascript);
    assert!(!config.python);
    assert!(config.keep_sandboxes);
    assert_eq!(config.install_timeout, Duration::from_secs(60));
}

#[cfg(feature = "config-yaml")]
#[test]
fn yaml_config_parses() {
    let doc =
        ExecutorFileConfig::from_yaml("languages: [python]\ntest_timeout_secs: 10\n").unwrap();
    let config = doc.resolve();
    assert!(config.python);
    assert!(!config.java);
    assert_eq!(config.test_timeout, Duration::from_secs(10));
}
