//! End-to-end tests driving the `arch-conform` binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_snapshot(dir: &Path, sealed: bool) {
    let snapshot = serde_json::json!({
        "project": "Ordering",
        "types": [{
            "name": "Order",
            "fqn": "Ordering.Order",
            "kind": "class",
            "modifiers": { "final": sealed },
            "file": "src/Order.cs",
            "line": 3
        }]
    });
    std::fs::write(
        dir.join("ordering.symbols.json"),
        serde_json::to_string_pretty(&snapshot).unwrap(),
    )
    .unwrap();
}

fn arch_conform(dir: &Path, args: &[&str]) -> Output {
    let global = dir.join("no-global-config");
    Command::new(env!("CARGO_BIN_EXE_arch-conform"))
        .args(args)
        .current_dir(dir)
        .env("ARCH_CONFORM_CONFIG_DIR", global)
        .env_remove("ARCH_CONFORM_CONFIG")
        .output()
        .unwrap()
}

#[test]
fn open_leaf_class_fails_check() {
    let tmp = TempDir::new().unwrap();
    write_snapshot(tmp.path(), false);

    let out = arch_conform(tmp.path(), &["check", "--rules", "DC001", "--format", "compact"]);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout.contains("src/Order.cs:3: error [DC001]"), "{stdout}");
}

#[test]
fn sealed_class_passes_check() {
    let tmp = TempDir::new().unwrap();
    write_snapshot(tmp.path(), true);

    let out = arch_conform(tmp.path(), &["check", "--rules", "sealed-concrete-class"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn json_output_is_machine_readable() {
    let tmp = TempDir::new().unwrap();
    write_snapshot(tmp.path(), false);

    let out = arch_conform(tmp.path(), &["check", "--rules", "DC001", "--format", "json"]);
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    assert_eq!(report["types_checked"], 1);
    assert_eq!(report["violations"][0]["code"], "DC001");
    assert_eq!(report["violations"][0]["location"]["project"], "Ordering");
}

#[test]
fn fail_on_warning_from_config() {
    let tmp = TempDir::new().unwrap();
    write_snapshot(tmp.path(), false);
    std::fs::write(
        tmp.path().join("arch-conform.toml"),
        "fail_on = \"warning\"\n\n[rules.sealed-concrete-class]\nseverity = \"warning\"\n",
    )
    .unwrap();

    let out = arch_conform(tmp.path(), &["check", "--rules", "DC001"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn disabled_rule_does_not_report() {
    let tmp = TempDir::new().unwrap();
    write_snapshot(tmp.path(), false);
    std::fs::write(
        tmp.path().join(".arch-conform.toml"),
        "[rules.sealed-concrete-class]\nenabled = false\n",
    )
    .unwrap();

    let out = arch_conform(tmp.path(), &["check", "--rules", "DC001"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn config_from_env_resolves_snapshots_beside_it() {
    let tmp = TempDir::new().unwrap();
    let ci = tmp.path().join("ci");
    let symbols = tmp.path().join("symbols");
    std::fs::create_dir_all(&ci).unwrap();
    std::fs::create_dir_all(&symbols).unwrap();
    write_snapshot(&symbols, false);
    std::fs::write(
        ci.join("arch-conform.toml"),
        "[engine]\nsnapshots = \"../symbols\"\n",
    )
    .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_arch-conform"))
        .args(["check", "--rules", "DC001", "--format", "json"])
        .current_dir(tmp.path())
        .env("ARCH_CONFORM_CONFIG_DIR", tmp.path().join("no-global-config"))
        .env("ARCH_CONFORM_CONFIG", ci.join("arch-conform.toml"))
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(report["types_checked"], 1);
}

#[test]
fn init_writes_config_once() {
    let tmp = TempDir::new().unwrap();

    let first = arch_conform(tmp.path(), &["init"]);
    assert!(first.status.success());
    assert!(tmp.path().join("arch-conform.toml").exists());

    let second = arch_conform(tmp.path(), &["init"]);
    assert!(!second.status.success());

    let forced = arch_conform(tmp.path(), &["init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn list_rules_shows_catalog() {
    let tmp = TempDir::new().unwrap();
    let out = arch_conform(tmp.path(), &["list-rules"]);
    let stdout = String::from_utf8_lossy(&out.stdout);

    assert!(out.status.success());
    assert!(stdout.contains("DC001"));
    assert!(stdout.contains("max-inheritance-depth"));
}
