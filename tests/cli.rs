// End-to-end runs of the `forecast` binary against saved documents.
use std::path::PathBuf;
use std::process::{Command, Output};

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_forecast");
    let mut command = Command::new(exe);
    command.env_remove("FORECAST_URL").env_remove("RUST_LOG");
    command
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(name)
        .to_str()
        .expect("utf8 path")
        .to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_should_exit_cleanly() {
    let output = cmd().arg("--help").output().expect("help");
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("--max-depth"));
    assert!(text.contains("--select"));
}

#[test]
fn unknown_flags_should_be_usage_errors() {
    let output = cmd().arg("--bogus").output().expect("bogus");
    assert_eq!(output.status.code(), Some(64));
    let text = stderr(&output);
    assert!(text.contains("unexpected argument '--bogus'"), "{text}");
    assert!(!text.contains("error: error:"), "{text}");
}

#[test]
fn out_of_range_depths_should_be_usage_errors() {
    for depth in ["0", "257", "18446744073709551615"] {
        let output = cmd()
            .args(["--max-depth", depth, "--file"])
            .arg(fixture("fixtures/json/forecast.json"))
            .output()
            .expect("max depth");
        assert_eq!(output.status.code(), Some(64), "--max-depth {depth}");
        assert!(stdout(&output).is_empty());
    }
}

#[test]
fn saved_forecast_should_print_tomorrow() {
    let output = cmd()
        .arg("--file")
        .arg(fixture("fixtures/json/forecast.json"))
        .args(["--select", "/properties/periods/3/temperatureTrend"])
        .output()
        .expect("forecast");
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("updated=2021-11-16T11:29:43+00:00\n"));
    assert!(text.contains("\nelevation={\"unitCode\":\"wmoUnit:m\",\"value\":426.1104}\n"));
    assert!(text.contains("\ntomorrow.name=Wednesday\n"));
    assert!(text.contains("\ntomorrow_night.name=Wednesday Night\n"));
    assert!(text.ends_with("\n/properties/periods/3/temperatureTrend=\n"));
}

#[test]
fn malformed_and_deep_documents_should_exit_with_parse_failures() {
    let output = cmd()
        .arg("--file")
        .arg(fixture("fixtures/json/invalid/missing_value.json"))
        .output()
        .expect("missing value");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error parsing weather response"));

    let temp = tempfile::tempdir().expect("tempdir");
    let deep = temp.path().join("deep.json");
    std::fs::write(&deep, format!("{}{}", "[".repeat(200_000), "]".repeat(200_000)))
        .expect("write deep document");
    let output = cmd()
        .args(["--max-depth", "256", "--file"])
        .arg(&deep)
        .output()
        .expect("deep");
    assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
}
