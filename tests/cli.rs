//! End-to-end tests of the `wvar` binary.

use std::fs;
use std::path::Path;
use std::process::Command;

fn wvar() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wvar"))
}

fn write_series(dir: &Path, name: &str, n: usize) -> std::path::PathBuf {
    let mut text = String::from("# synthetic series\n");
    for i in 0..n {
        let x = (i as f64 * 0.37).sin() + 0.5 * (i as f64 * 1.9).cos();
        text.push_str(&format!("{x}\n"));
        if i % 50 == 0 {
            text.push('\n');
        }
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn estimate_writes_result_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_series(dir.path(), "series.txt", 256);
    let output = dir.path().join("result.json");

    let status = wvar()
        .args(["estimate", "--robust", "-J", "4", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let text = fs::read_to_string(&output).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["decomposition"], "modwt");
    assert_eq!(json["robust"], true);
    assert_eq!(json["levels"].as_array().unwrap().len(), 4);
}

#[test]
fn config_file_and_compare() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_series(dir.path(), "series.txt", 500);
    let config = dir.path().join("wvar.toml");
    fs::write(
        &config,
        "[estimate]\ndecomposition = \"dwt\"\nlevels = 3\nfrom_unit = \"sec\"\nto_unit = \"min\"\n",
    )
    .unwrap();

    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");
    for (out, extra) in [(&first, None), (&second, Some("--robust"))] {
        let mut cmd = wvar();
        cmd.arg("estimate")
            .arg("--config")
            .arg(&config)
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(out);
        if let Some(flag) = extra {
            cmd.arg(flag);
        }
        assert!(cmd.status().unwrap().success());
    }

    let a: serde_json::Value = serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
    assert_eq!(a["decomposition"], "dwt");
    assert_eq!(a["unit"], "min");
    assert_eq!(a["samples_used"], 496);
    assert_eq!(a["warnings"][0]["kind"], "truncated");

    let out = wvar().arg("compare").arg(&first).arg(&second).output().unwrap();
    assert!(out.status.success());
    let range: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let scale_min = range["scale_min"].as_f64().unwrap();
    assert!((scale_min - 2.0 / 60.0).abs() < 1e-12);
}

#[test]
fn compare_rejects_foreign_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.json");
    fs::write(&path, "{\"hello\": 1}").unwrap();
    let out = wvar().arg("compare").arg(&path).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("type mismatch"));
}

#[test]
fn bad_efficiency_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_series(dir.path(), "series.txt", 64);
    let out = wvar()
        .args(["estimate", "--robust", "--efficiency", "0.995", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("too high"));
}
