//! Exclusion globs over declaration file paths.

use std::path::Path;

/// A compiled set of exclude globs.
///
/// Patterns match against the file path a type was declared in, relative to
/// its project root. `**/Migrations/**` style patterns also match when the
/// path has no leading directory.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<glob::Pattern>,
}

impl ExcludeSet {
    /// Compiles patterns.
    ///
    /// # Errors
    ///
    /// Returns the first invalid pattern's error.
    pub fn new<I, S>(patterns: I) -> Result<Self, glob::PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| glob::Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true when no pattern is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks if a path should be excluded.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        let rooted = format!("/{path_str}");

        self.patterns
            .iter()
            .any(|pattern| pattern.matches(&path_str) || pattern.matches(&rooted))
    }
}
