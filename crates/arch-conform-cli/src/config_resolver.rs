//! Locating and loading `arch-conform.toml`.
//!
//! Lookup order: `--config` (or `ARCH_CONFORM_CONFIG`), then
//! `arch-conform.toml` / `.arch-conform.toml` in the checked directory, then
//! `config.toml` in the global directory (`$ARCH_CONFORM_CONFIG_DIR` or
//! `~/.arch-conform`). Without any file the built-in defaults apply.
//!
//! A relative `engine.snapshots` is anchored where the setting was written:
//! the directory of an explicit or project config file. A global config
//! describes no particular project, so its snapshot path stays relative to
//! the checked directory, as do the defaults.

use anyhow::{Context, Result};
use arch_conform_core::Config;
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["arch-conform.toml", ".arch-conform.toml"];
const GLOBAL_FILE: &str = "config.toml";
const GLOBAL_DIR_ENV: &str = "ARCH_CONFORM_CONFIG_DIR";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag or `ARCH_CONFORM_CONFIG`.
    Explicit(PathBuf),
    /// A config file in the checked directory.
    Project(PathBuf),
    /// The per-user config file.
    Global(PathBuf),
    /// No file; built-in defaults.
    Default,
}

impl ConfigSource {
    /// The config file, if one was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Directory a relative `engine.snapshots` is resolved against.
    fn anchor<'a>(&'a self, project_dir: &'a Path) -> &'a Path {
        match self {
            Self::Explicit(p) | Self::Project(p) => match p.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            },
            Self::Global(_) | Self::Default => project_dir,
        }
    }
}

/// A loaded configuration and the snapshot directory it selects.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Where the configuration came from.
    pub source: ConfigSource,
    /// Parsed configuration.
    pub config: Config,
    /// Directory scanned for `*.symbols.json`.
    pub snapshots: PathBuf,
}

/// Finds and loads the configuration for checking `project_dir`.
///
/// # Errors
///
/// Returns an error if the selected file cannot be read or parsed.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let source = locate(project_dir, explicit, global_dir().as_deref());
    load_from(project_dir, source)
}

fn load_from(project_dir: &Path, source: ConfigSource) -> Result<ResolvedConfig> {
    let config = match source.path() {
        None => Config::default(),
        Some(path) => {
            if matches!(source, ConfigSource::Global(_)) {
                tracing::info!("Using global config: {}", path.display());
            } else {
                tracing::debug!("Using config: {}", path.display());
            }
            Config::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
    };
    let snapshots = source.anchor(project_dir).join(&config.engine.snapshots);
    Ok(ResolvedConfig {
        source,
        config,
        snapshots,
    })
}

fn locate(project_dir: &Path, explicit: Option<&Path>, global: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(path) = PROJECT_FILES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.is_file())
    {
        return ConfigSource::Project(path);
    }

    global
        .map(|dir| dir.join(GLOBAL_FILE))
        .filter(|path| path.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

fn global_dir() -> Option<PathBuf> {
    match std::env::var_os(GLOBAL_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".arch-conform")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Layout {
        project: TempDir,
        global: TempDir,
    }

    impl Layout {
        fn new() -> Self {
            Self {
                project: TempDir::new().unwrap(),
                global: TempDir::new().unwrap(),
            }
        }

        fn project_file(&self, name: &str, content: &str) -> PathBuf {
            let path = self.project.path().join(name);
            fs::write(&path, content).unwrap();
            path
        }

        fn global_file(&self, content: &str) -> PathBuf {
            let path = self.global.path().join(GLOBAL_FILE);
            fs::write(&path, content).unwrap();
            path
        }

        fn locate(&self, explicit: Option<&Path>) -> ConfigSource {
            locate(self.project.path(), explicit, Some(self.global.path()))
        }
    }

    #[test]
    fn lookup_order() {
        let layout = Layout::new();
        assert_eq!(layout.locate(None), ConfigSource::Default);

        let global = layout.global_file("");
        assert_eq!(layout.locate(None), ConfigSource::Global(global));

        let dotted = layout.project_file(".arch-conform.toml", "");
        assert_eq!(layout.locate(None), ConfigSource::Project(dotted));

        let plain = layout.project_file("arch-conform.toml", "");
        assert_eq!(layout.locate(None), ConfigSource::Project(plain));

        let explicit = Path::new("/elsewhere/ci.toml");
        assert_eq!(
            layout.locate(Some(explicit)),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let layout = Layout::new();
        fs::create_dir(layout.project.path().join("arch-conform.toml")).unwrap();
        assert_eq!(layout.locate(None), ConfigSource::Default);
    }

    #[test]
    fn project_snapshots_are_relative_to_config_file() {
        let layout = Layout::new();
        let path = layout.project_file("arch-conform.toml", "[engine]\nsnapshots = \"out\"\n");

        let resolved = load_from(Path::new("/unused"), ConfigSource::Project(path)).unwrap();
        assert_eq!(resolved.snapshots, layout.project.path().join("out"));
    }

    #[test]
    fn explicit_config_in_another_directory_anchors_snapshots() {
        let layout = Layout::new();
        let ci = layout.global.path().join("ci");
        fs::create_dir(&ci).unwrap();
        let path = ci.join("arch-conform.toml");
        fs::write(&path, "[engine]\nsnapshots = \"../symbols\"\n").unwrap();

        let resolved = load_from(layout.project.path(), ConfigSource::Explicit(path)).unwrap();
        assert_eq!(resolved.snapshots, ci.join("../symbols"));
    }

    #[test]
    fn global_and_default_snapshots_follow_checked_directory() {
        let layout = Layout::new();
        let global = layout.global_file("[engine]\nsnapshots = \"build/symbols\"\n");

        let resolved = load_from(layout.project.path(), ConfigSource::Global(global)).unwrap();
        assert_eq!(
            resolved.snapshots,
            layout.project.path().join("build/symbols")
        );

        let defaults = load_from(layout.project.path(), ConfigSource::Default).unwrap();
        assert_eq!(defaults.snapshots, layout.project.path().join("."));
        assert!(defaults.config.preset.is_none());
    }

    #[test]
    fn absolute_snapshots_are_kept() {
        let layout = Layout::new();
        let target = layout.global.path().join("abs");
        let path = layout.project_file(
            "arch-conform.toml",
            &format!("[engine]\nsnapshots = {:?}\n", target.display().to_string()),
        );

        let resolved = load_from(layout.project.path(), ConfigSource::Project(path)).unwrap();
        assert_eq!(resolved.snapshots, target);
    }

    #[test]
    fn unreadable_explicit_config_is_an_error() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/arch-conform.toml"));
        let err = load_from(Path::new("."), source).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
