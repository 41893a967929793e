// Shared event-stream fixtures
#![allow(dead_code)]

use serde_json::{Value, json};

fn test_report(nodeid: &str, when: &str, outcome: &str, longrepr: Value) -> Value {
    json!({
        "$report_type": "TestReport",
        "nodeid": nodeid,
        "location": ["test_example.py", 0, nodeid],
        "keywords": {},
        "when": when,
        "outcome": outcome,
        "longrepr": longrepr,
        "sections": [],
        "duration": 0.001,
    })
}

fn short_traceback(entries: Vec<(&str, u32, &str, Vec<&str>)>, crash: &str) -> Value {
    let reprentries: Vec<Value> = entries
        .into_iter()
        .map(|(path, lineno, func, lines)| {
            json!({
                "type": "ReprEntry",
                "data": {
                    "lines": lines,
                    "reprfuncargs": null,
                    "reprlocals": null,
                    "reprfileloc": {"path": path, "lineno": lineno, "message": format!("in {}", func)},
                    "style": "short",
                }
            })
        })
        .collect();

    json!({
        "reprcrash": {"path": "/work/test_example.py", "lineno": 1, "message": crash},
        "reprtraceback": {"reprentries": reprentries, "extraline": null, "style": "short"},
        "sections": [],
        "chain": [],
    })
}

/// Report log of a pytest session over a small example suite:
/// five passes, one failure, one skip and one expected failure.
pub fn pytest_example_log() -> String {
    let mut lines = vec![
        json!({"$report_type": "SessionStart", "pytest_version": "8.3.4"}),
        json!({"$report_type": "CollectReport", "nodeid": "", "outcome": "passed", "longrepr": null, "result": []}),
        json!({"$report_type": "CollectReport", "nodeid": "test_example.py", "outcome": "passed", "longrepr": null, "result": []}),
    ];

    for id in ["test_invalid_input[-False]", "test_invalid_input[x-True]"] {
        let nodeid = format!("test_example.py::{}", id);
        for when in ["setup", "call", "teardown"] {
            lines.push(test_report(&nodeid, when, "passed", Value::Null));
        }
    }

    let edge = "test_example.py::test_edge_case";
    lines.push(test_report(edge, "setup", "passed", Value::Null));
    lines.push(test_report(
        edge,
        "call",
        "failed",
        short_traceback(
            vec![
                (
                    "test_example.py",
                    35,
                    "test_edge_case",
                    vec!["    result = parser.extract_tokens(empty_data)"],
                ),
                (
                    "test_example.py",
                    15,
                    "extract_tokens",
                    vec!["    return data[0]", "E   IndexError: list index out of range"],
                ),
            ],
            "IndexError: list index out of range",
        ),
    ));
    lines.push(test_report(edge, "teardown", "passed", Value::Null));

    let future = "test_example.py::test_future_feature";
    lines.push(test_report(
        future,
        "setup",
        "skipped",
        json!(["/work/test_example.py", 41, "Skipped: Not implemented yet"]),
    ));
    lines.push(test_report(future, "teardown", "passed", Value::Null));

    let known = "test_example.py::test_known_bug";
    lines.push(test_report(known, "setup", "passed", Value::Null));
    let mut xfail = test_report(
        known,
        "call",
        "skipped",
        short_traceback(
            vec![(
                "test_example.py",
                49,
                "test_known_bug",
                vec!["    raise ValueError(\"Known issue\")", "E   ValueError: Known issue"],
            )],
            "ValueError: Known issue",
        ),
    );
    xfail["wasxfail"] = json!("Bug #123");
    lines.push(xfail);
    lines.push(test_report(known, "teardown", "passed", Value::Null));

    for id in ["test_simple", "test_validation_pass", "test_critical_path"] {
        let nodeid = format!("test_example.py::{}", id);
        for when in ["setup", "call", "teardown"] {
            lines.push(test_report(&nodeid, when, "passed", Value::Null));
        }
    }

    lines.push(json!({"$report_type": "SessionFinish", "exitstatus": 1}));

    lines
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Expected default-verbosity report for `pytest_example_log`
pub const PYTEST_EXAMPLE_REPORT: &str = "# Test Report

**Summary:** 5/8 passed, 1 failed, 1 skipped, 1 xfail

## Failures

### test_example.py::test_edge_case FAILED

```python
test_example.py:35: in test_edge_case
    result = parser.extract_tokens(empty_data)
test_example.py:15: in extract_tokens
    return data[0]
E   IndexError: list index out of range
```

### test_example.py::test_future_feature SKIPPED

**Reason:** Not implemented yet

### test_example.py::test_known_bug XFAIL

**Reason:** Bug #123

```python
test_example.py:49: in test_known_bug
    raise ValueError(\"Known issue\")
E   ValueError: Known issue
```
";

/// Pytest log whose only content is a failed module import
pub fn pytest_collection_error_log() -> String {
    [
        json!({"$report_type": "SessionStart", "pytest_version": "8.3.4"}),
        json!({
            "$report_type": "CollectReport",
            "nodeid": "tests/test_broken.py",
            "outcome": "failed",
            "longrepr": "ImportError while importing test module 'tests/test_broken.py'.\nE   ModuleNotFoundError: No module named 'missing_dep'\n",
            "result": [],
        }),
        json!({"$report_type": "SessionFinish", "exitstatus": 2}),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n")
}

/// libtest output of one binary with a pass and a failure, mixed with
/// the plain-text lines cargo prints around it
pub fn libtest_lines() -> String {
    [
        "running 2 tests",
        r#"{ "type": "suite", "event": "started", "test_count": 2 }"#,
        r#"{ "type": "test", "event": "started", "name": "tests::test_simple" }"#,
        r#"{ "type": "test", "event": "started", "name": "tests::test_critical_path" }"#,
        r#"{ "type": "test", "name": "tests::test_simple", "event": "ok" }"#,
        r#"{ "type": "test", "name": "tests::test_critical_path", "event": "failed", "stdout": "AssertionError: boom\n" }"#,
        r#"{ "type": "suite", "event": "failed", "passed": 1, "failed": 1, "ignored": 0, "measured": 0, "filtered_out": 0, "exec_time": 0.01 }"#,
    ]
    .join("\n")
}
