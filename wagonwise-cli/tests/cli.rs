use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "wagonwise-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let exe = env!("CARGO_BIN_EXE_wagonwise");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args(args)
        .args(["--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success(), "wagonwise {args:?} failed");
    let content = std::fs::read_to_string(&output_path).expect("read output");
    std::fs::remove_file(output_path).ok();
    serde_json::from_str(&content).expect("valid json")
}

#[test]
fn cli_advise_reports_trader_sale() {
    let value = run_json(&[
        "advise",
        "--rank",
        "47",
        "--cash",
        "1444",
        "--gold",
        "9.5",
        "--role",
        "trader=12000",
        "--wagon-load",
        "95",
    ]);
    assert_eq!(value["rule_id"], "trader_sale");
    assert_eq!(value["priority"], "critical");
}

#[test]
fn cli_explain_includes_diagnostics() {
    let value = run_json(&["explain", "--rank", "5", "--cash", "50", "--gold", "2"]);
    assert_eq!(value["rule_id"], "naturalist_gold_shortfall");
    assert_eq!(
        value["diagnostics"]["skipped_rules_with_reasons"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
}

#[test]
fn cli_route_finds_two_hop_path() {
    let value = run_json(&["route", "--from", "valentine", "--to", "saintdenis"]);
    assert_eq!(value["hops"], 2);
    assert_eq!(value["cost"], 10);
    assert_eq!(value["path"][1], "vanhorn");
}

#[test]
fn cli_travel_uses_config_hold() {
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{ "travel": { "commit_hold_ms": 0 } }"#).expect("write config");
    let config = config_path.to_string_lossy().to_string();
    let value = run_json(&[
        "--config",
        &config,
        "travel",
        "--from",
        "valentine",
        "--to",
        "saintdenis",
        "--funds",
        "25",
    ]);
    std::fs::remove_file(config_path).ok();
    assert_eq!(value["destination"], "saintdenis");
    assert_eq!(value["funds_after"], 15.0);
}

#[test]
fn cli_travel_rejects_short_funds() {
    let exe = env!("CARGO_BIN_EXE_wagonwise");
    let output = Command::new(exe)
        .args(["travel", "--from", "valentine", "--to", "saintdenis", "--funds", "2"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("travel costs $10"), "{stderr}");
    assert!(!stderr.contains("Saddling up"), "{stderr}");
}

#[test]
fn cli_locations_lists_frontier() {
    let value = run_json(&["locations"]);
    assert_eq!(value.as_array().map(Vec::len), Some(19));
}
