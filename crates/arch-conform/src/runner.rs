//! Internal runner for `check!()` macro integration.
//!
//! This module is `#[doc(hidden)]` and not part of the public API.
//! It is called by the generated test function from `arch_conform::check!()`.

use arch_conform_core::{Analyzer, Config, Severity};
use arch_conform_rules::{rules_from_config, Preset};
use std::path::{Path, PathBuf};

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["arch-conform.toml", ".arch-conform.toml"];

/// Arguments passed to `check!()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOptions {
    preset: Option<String>,
    config: Option<String>,
    fail_on: Option<String>,
}

impl CheckOptions {
    /// Records one `key = "value"` macro argument.
    ///
    /// # Panics
    ///
    /// Panics on an unknown key.
    #[must_use]
    pub fn set(mut self, key: &str, value: &str) -> Self {
        let slot = match key {
            "preset" => &mut self.preset,
            "config" => &mut self.config,
            "fail_on" => &mut self.fail_on,
            other => panic!(
                "arch-conform: unknown check! argument `{other}`. Valid arguments: preset, config, fail_on"
            ),
        };
        *slot = Some(value.to_string());
        self
    }
}

/// Runs the conformance checks as part of `cargo test`.
///
/// Called by the `check!()` macro-generated test function.
/// Panics with a formatted report if violations are found.
///
/// # Panics
///
/// Panics if violations at or above `fail_on` severity are found, if a rule
/// failed to execute, or if the analyzer cannot be built.
pub fn run_check(options: &CheckOptions) {
    let root = find_project_root();
    let content = read_config_content(&root, options.config.as_deref());
    let mut config = parse_config(&content);

    let preset = resolve_preset(options.preset.as_deref(), &config);
    let fail_on = resolve_fail_on(options.fail_on.as_deref(), &config);
    config.preset = Some(preset.name().to_string());

    let snapshots = root.join(&config.engine.snapshots);
    let rules = rules_from_config(&config);

    let analyzer = Analyzer::builder()
        .config(config)
        .rules(rules)
        .build()
        .unwrap_or_else(|e| {
            panic!("arch-conform: failed to build analyzer: {e}");
        });

    let report = analyzer.analyze_snapshots(&snapshots).unwrap_or_else(|e| {
        panic!("arch-conform: analysis failed: {e}");
    });

    if report.has_violations_at(fail_on) || report.has_rule_errors() {
        panic!("{}", report.format_test_report(fail_on));
    }
}

/// Reads the raw TOML content from the config file.
///
/// Returns an empty string if no config file is found.
fn read_config_content(root: &Path, explicit_path: Option<&str>) -> String {
    if let Some(path) = explicit_path {
        let full_path = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            root.join(path)
        };
        return std::fs::read_to_string(&full_path).unwrap_or_else(|e| {
            panic!(
                "arch-conform: failed to read config from {}: {e}",
                full_path.display()
            );
        });
    }

    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            return std::fs::read_to_string(&path).unwrap_or_else(|e| {
                panic!(
                    "arch-conform: failed to read config from {}: {e}",
                    path.display()
                );
            });
        }
    }

    String::new()
}

/// Parses a `Config` from TOML content.
fn parse_config(content: &str) -> Config {
    if content.is_empty() {
        return Config::default();
    }
    Config::parse(content).unwrap_or_else(|e| {
        panic!("arch-conform: failed to parse config: {e}");
    })
}

/// Checks whether a `Cargo.toml` file defines a `[workspace]` section
/// by parsing as TOML, avoiding false positives from comments or strings.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the project root by looking for `Cargo.toml` from `CARGO_MANIFEST_DIR`.
fn find_project_root() -> PathBuf {
    // CARGO_MANIFEST_DIR points to the crate containing the test,
    // which may be a workspace member. Walk up to find workspace root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);

        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }

        return manifest_path;
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolves the effective preset from macro arg > config > default.
fn resolve_preset(macro_arg: Option<&str>, config: &Config) -> Preset {
    let name = macro_arg
        .or(config.preset.as_deref())
        .unwrap_or("recommended");

    Preset::from_name(name).unwrap_or_else(|| {
        panic!("arch-conform: unknown preset `{name}`. Valid presets: recommended, strict, minimal")
    })
}

/// Resolves the effective `fail_on` severity from macro arg > config > default.
fn resolve_fail_on(macro_arg: Option<&str>, config: &Config) -> Severity {
    let name = macro_arg.or(config.fail_on.as_deref()).unwrap_or("error");

    name.parse().unwrap_or_else(|_| {
        panic!("arch-conform: unknown severity `{name}`. Valid values: error, warning, info")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_defaults_to_recommended() {
        let config = Config::default();
        assert_eq!(resolve_preset(None, &config), Preset::Recommended);
    }

    #[test]
    fn resolve_preset_macro_arg_takes_precedence() {
        let mut config = Config::default();
        config.preset = Some("minimal".to_string());
        assert_eq!(resolve_preset(Some("strict"), &config), Preset::Strict);
    }

    #[test]
    fn resolve_preset_from_config() {
        let mut config = Config::default();
        config.preset = Some("strict".to_string());
        assert_eq!(resolve_preset(None, &config), Preset::Strict);
    }

    #[test]
    #[should_panic(expected = "unknown preset")]
    fn resolve_preset_invalid_panics() {
        let config = Config::default();
        resolve_preset(Some("nonexistent"), &config);
    }

    #[test]
    fn resolve_fail_on_defaults_to_error() {
        let config = Config::default();
        assert_eq!(resolve_fail_on(None, &config), Severity::Error);
    }

    #[test]
    fn resolve_fail_on_macro_arg_overrides_config() {
        let mut config = Config::default();
        config.fail_on = Some("info".to_string());
        assert_eq!(resolve_fail_on(Some("warning"), &config), Severity::Warning);
    }

    #[test]
    #[should_panic(expected = "unknown severity")]
    fn resolve_fail_on_invalid_panics() {
        let config = Config::default();
        resolve_fail_on(Some("critical"), &config);
    }

    #[test]
    fn options_collect_macro_arguments() {
        let options = CheckOptions::default()
            .set("preset", "minimal")
            .set("fail_on", "warning");
        assert_eq!(options.preset.as_deref(), Some("minimal"));
        assert_eq!(options.fail_on.as_deref(), Some("warning"));
        assert!(options.config.is_none());
    }

    #[test]
    #[should_panic(expected = "unknown check! argument")]
    fn options_reject_unknown_argument() {
        let _ = CheckOptions::default().set("root", "src");
    }

    #[test]
    fn explicit_config_is_read_relative_to_root() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("custom.toml"), "preset = \"strict\"\n").unwrap();

        let content = read_config_content(tmp.path(), Some("custom.toml"));
        assert_eq!(parse_config(&content).preset.as_deref(), Some("strict"));
    }

    #[test]
    fn project_config_candidates_are_found() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".arch-conform.toml"), "fail_on = \"info\"\n").unwrap();

        let content = read_config_content(tmp.path(), None);
        assert_eq!(parse_config(&content).fail_on.as_deref(), Some("info"));
    }

    #[test]
    fn workspace_section_detection() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = tmp.path().join("Cargo.toml");
        std::fs::write(&manifest, "# [workspace]\n[package]\nname = \"x\"\n").unwrap();
        assert!(!has_workspace_section(&manifest));

        std::fs::write(&manifest, "[workspace]\nmembers = []\n").unwrap();
        assert!(has_workspace_section(&manifest));
    }
}
