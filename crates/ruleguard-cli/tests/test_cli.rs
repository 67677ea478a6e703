use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn ruleguard(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ruleguard"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn setup(dir: &TempDir, rules: &str) -> (String, String) {
    let data = dir.path().join("orders.csv");
    fs::write(
        &data,
        "id,price,status\n1,4.99,OK\n2,5.01,\n3,5.00,KO\n",
    )
    .unwrap();
    let config = dir.path().join("rules.toml");
    fs::write(&config, rules).unwrap();
    (
        config.to_str().unwrap().to_string(),
        data.to_str().unwrap().to_string(),
    )
}

const PASSING: &str = r#"
[stats]
avg_price = { total = 4.0, std = 0.5 }

[[flow]]
id = "orders"

[[flow.rule]]
columns = "id"
type = "UNIQUE"
error_message = "duplicate id"

[[flow.rule]]
columns = "price"
type = "HISTORICAL_GREATER"
parameter = "avg_price"
error_message = "price dropped"

[[flow.rule]]
columns = "ghost"
type = "NOT_NULL"
error_message = "never reported"
"#;

const FAILING: &str = r#"
[[flow]]
id = "orders"

[[flow.rule]]
columns = "status"
type = "NOT_NULL"
error_message = "status has nulls"

[[flow.rule]]
columns = "price"
type = "AVERAGE"
parameter = "5.0"
error_message = "average drifted"
"#;

#[test]
fn test_passing_flow_exits_zero() {
    let dir = tempdir().unwrap();
    let (config, data) = setup(&dir, PASSING);

    let output = ruleguard(&["--config", &config, "--data", &data, "--flow", "orders"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("flow orders (3 rows) - PASSED"));
    assert!(stdout.contains("skipped (column 'ghost' not found)"));
}

#[test]
fn test_failing_flow_exits_one() {
    let dir = tempdir().unwrap();
    let (config, data) = setup(&dir, FAILING);

    let output = ruleguard(&["--config", &config, "--data", &data, "--parallel"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAILED: status has nulls"));
    assert!(stdout.contains("Result: 1 failed, 0 passed"));
}

#[test]
fn test_json_report_file() {
    let dir = tempdir().unwrap();
    let (config, data) = setup(&dir, FAILING);
    let out = dir.path().join("reports/run.json");

    let output = ruleguard(&[
        "--config",
        &config,
        "--data",
        &data,
        "--output",
        "json",
        "--out-file",
        out.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(Path::new(&out).exists());
    let report = fs::read_to_string(&out).unwrap();
    assert!(report.contains("\"pass\": false"));
    assert!(report.contains("\"status has nulls\""));
}

#[test]
fn test_missing_stats_aborts_with_error() {
    let dir = tempdir().unwrap();
    let rules = PASSING.replace("avg_price = { total = 4.0, std = 0.5 }", "");
    let (config, data) = setup(&dir, &rules);

    let output = ruleguard(&["--config", &config, "--data", &data, "--cache-stats"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Validation of flow 'orders' aborted"));
    assert!(stderr.contains("avg_price"));
}

#[test]
fn test_unknown_flow_and_missing_data() {
    let dir = tempdir().unwrap();
    let (config, _) = setup(&dir, FAILING);

    let output = ruleguard(&["--config", &config, "--flow", "billing"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Flow 'billing' not found"));

    let output = ruleguard(&["--config", &config]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No data file for flow 'orders'"));
}
