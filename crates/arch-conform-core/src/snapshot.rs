//! Loading project symbol snapshots from disk.
//!
//! The analysis frontend writes one `*.symbols.json` document per project.
//! Discovery walks a directory with the `ignore` crate so build output and
//! gitignored paths are skipped the same way a developer's tools skip them.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::model::{ProjectSnapshot, Workspace};

/// File name suffix of symbol snapshots.
pub const SNAPSHOT_SUFFIX: &str = ".symbols.json";

/// Errors raised while loading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// IO error reading a snapshot.
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for the expected shape.
    #[error("Invalid snapshot {path}: {source}")]
    Json {
        /// Offending file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Directory traversal failed.
    #[error("Failed to walk {root}: {source}")]
    Walk {
        /// Directory being walked.
        root: PathBuf,
        /// Underlying walk error.
        source: ignore::Error,
    },

    /// The snapshot parsed but cannot be used.
    #[error("Invalid snapshot {path}: {message}")]
    Invalid {
        /// Offending file.
        path: PathBuf,
        /// What is wrong.
        message: String,
    },
}

/// Options for snapshot discovery.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    respect_gitignore: bool,
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
        }
    }
}

impl SnapshotLoader {
    /// Creates a loader with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether discovery respects .gitignore files.
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Finds every snapshot under `root`, sorted by path.
    ///
    /// A `root` that is itself a snapshot file yields just that file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be walked.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, SnapshotError> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry.map_err(|source| SnapshotError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_snapshot = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SNAPSHOT_SUFFIX));
            if is_snapshot {
                debug!("Found snapshot: {}", path.display());
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Reads and parses one snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn read(&self, path: &Path) -> Result<ProjectSnapshot, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_snapshot(&content).map_err(|e| e.with_path(path))
    }

    /// Discovers and loads every snapshot under `root` into a workspace.
    ///
    /// # Errors
    ///
    /// Returns the first discovery, read or parse error.
    pub fn load(&self, root: &Path) -> Result<Workspace, SnapshotError> {
        let files = self.discover(root)?;
        info!("Loading {} snapshot(s) from {}", files.len(), root.display());

        let projects = files
            .iter()
            .map(|path| self.read(path))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Workspace::new(projects))
    }
}

/// Parses a snapshot document.
///
/// # Errors
///
/// Returns an error if the JSON does not describe a project snapshot.
pub fn parse_snapshot(content: &str) -> Result<ProjectSnapshot, SnapshotError> {
    let snapshot: ProjectSnapshot =
        serde_json::from_str(content).map_err(|source| SnapshotError::Json {
            path: PathBuf::new(),
            source,
        })?;
    if snapshot.project.trim().is_empty() {
        return Err(SnapshotError::Invalid {
            path: PathBuf::new(),
            message: "project name is empty".to_string(),
        });
    }
    Ok(snapshot)
}

impl SnapshotError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Json { source, .. } => Self::Json {
                path: path.to_path_buf(),
                source,
            },
            Self::Invalid { message, .. } => Self::Invalid {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_snapshot() -> serde_json::Value {
        json!({
            "project": "Ordering",
            "types": [{
                "name": "Order",
                "fqn": "Ordering.Order",
                "kind": "class",
                "file": "src/Order.cs",
                "line": 5,
                "ancestors": [{ "name": "Entity", "abstract": true }],
                "members": [{
                    "name": "ChangeStatus",
                    "kind": "method",
                    "accessibility": "public",
                    "line": 12,
                    "returns": { "name": "Order", "nullable": true },
                    "body": [{ "kind": "invocation", "line": 13, "name": "RegisterChange" }]
                }]
            }]
        })
    }

    #[test]
    fn parses_snapshot_with_lazy_bodies() {
        let snapshot = parse_snapshot(&order_snapshot().to_string()).unwrap();
        assert_eq!(snapshot.project, "Ordering");

        let member = &snapshot.types[0].members[0];
        assert!(member.body.has_source());
        assert!(!member.body.is_materialized());
        assert_eq!(member.body.nodes().unwrap().len(), 1);
    }

    #[test]
    fn rejects_empty_project_name() {
        let err = parse_snapshot(r#"{ "project": " ", "types": [] }"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Invalid { .. }));
    }

    #[test]
    fn discovers_and_loads_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/ordering.symbols.json"),
            order_snapshot().to_string(),
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let loader = SnapshotLoader::new();
        let files = loader.discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);

        let ws = loader.load(dir.path()).unwrap();
        assert_eq!(ws.projects().len(), 1);
        assert_eq!(ws.type_count(), 1);
    }

    #[test]
    fn read_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.symbols.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SnapshotLoader::new().read(&path).unwrap_err();
        assert!(err.to_string().contains("broken.symbols.json"));
    }
}
