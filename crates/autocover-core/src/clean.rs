//! Normalization of generated code before it touches disk.
//!
//! Generators wrap code in markdown fences and occasionally emit import
//! paths that don't match the sandbox layout. Every helper here is
//! idempotent: applying it twice equals applying it once.

/// Drop markdown fence lines: bare ``` closers and ``` openers carrying one
/// of the given language tags (`"python"`, `"js"`, …).
pub fn strip_code_fences(code: &str, tags: &[&str]) -> String {
    let mut out = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim();
        if trimmed == "```" {
            continue;
        }
        if let Some(tag) = trimmed.strip_prefix("```") {
            if tags.iter().any(|t| tag.eq_ignore_ascii_case(t)) {
                continue;
            }
        }
        out.push(line);
    }
    out.join("\n")
}

/// Rewrite bare `from src import …` statements to target the actual module
/// written into the sandbox (`from src.<module> import …`).
///
/// The replacement text no longer matches the pattern, so the rewrite is
/// idempotent.
pub fn rewrite_src_imports(code: &str, module: &str) -> String {
    code.replace("from src import ", &format!("from src.{module} import "))
}

/// Prepend `import pytest` when the test file never imports it.
pub fn ensure_pytest_import(code: &str) -> String {
    if code.contains("import pytest") {
        code.to_string()
    } else {
        format!("import pytest\n{code}")
    }
}
