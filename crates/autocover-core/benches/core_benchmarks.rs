use autocover_core::clean::strip_code_fences;
use autocover_core::parse::{parse_jest_stdout, parse_pytest_json, parse_surefire_stdout};
use autocover_core::profile::{LanguageProfile, PythonProfile};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_strip_fences(c: &mut Criterion) {
    let code = "```python\n".to_string()
        + &"def f(x):\n    return x * 2\n".repeat(50)
        + "```\n";
    c.bench_function("strip_fences", |b| {
        b.iter(|| {
            strip_code_fences(black_box(&code), &["python", "py"]);
        });
    });
}

fn bench_python_clean(c: &mut Criterion) {
    let profile = PythonProfile::new();
    let code = "```python\nfrom src import add\n".to_string()
        + &"def test_case():\n    assert add(1, 2) == 3\n".repeat(30)
        + "```";
    c.bench_function("python_clean", |b| {
        b.iter(|| {
            profile.clean_code(black_box(&code), black_box("calculator"));
        });
    });
}

fn bench_pytest_report_parse(c: &mut Criterion) {
    let tests: Vec<String> = (0..100)
        .map(|i| {
            format!(
                r#"{{"nodeid": "tests/test_calc.py::test_{i}", "outcome": "{}", "call": {{"longrepr": "assert failed"}}}}"#,
                if i % 7 == 0 { "failed" } else { "passed" }
            )
        })
        .collect();
    let report = format!(
        r#"{{"summary": {{"total": 100, "passed": 85, "failed": 15}}, "tests": [{}]}}"#,
        tests.join(",")
    );
    c.bench_function("pytest_report_parse", |b| {
        b.iter(|| {
            parse_pytest_json(black_box(&report));
        });
    });
}

fn bench_stdout_fallbacks(c: &mut Criterion) {
    let jest = "PASS tests/calc.test.js\nTests:       3 failed, 17 passed, 20 total\n";
    let surefire = "[INFO] Tests run: 20, Failures: 2, Errors: 1, Skipped: 0\n";
    c.bench_function("jest_stdout_parse", |b| {
        b.iter(|| {
            parse_jest_stdout(black_box(jest));
        });
    });
    c.bench_function("surefire_stdout_parse", |b| {
        b.iter(|| {
            parse_surefire_stdout(black_box(surefire));
        });
    });
}

criterion_group!(
    benches,
    bench_strip_fences,
    bench_python_clean,
    bench_pytest_report_parse,
    bench_stdout_fallbacks
);
criterion_main!(benches);
