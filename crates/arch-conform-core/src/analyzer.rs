//! Rule Runner: evaluates every registered rule against every eligible type.

use crate::cancel::CancellationToken;
use crate::config::{Config, ConfigError, RuleConfig};
use crate::context::RuleContext;
use crate::lineage::Lineage;
use crate::model::{TypeDecl, TypeSymbol, Workspace, WorkspaceIndex};
use crate::rule::{Rule, RuleBox};
use crate::snapshot::{SnapshotError, SnapshotLoader};
use crate::types::{Report, RuleError, Violation};
use crate::utils::paths::ExcludeSet;

use rayon::prelude::*;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while configuring or running the analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Two registered rules share a name.
    #[error("Rule `{name}` is registered more than once")]
    DuplicateRule {
        /// Offending rule name.
        name: String,
    },

    /// Parallelism must be at least one worker.
    #[error("Parallelism must be at least 1")]
    InvalidParallelism,

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot loading error.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    lineage_roots: Option<Vec<String>>,
    parallelism: Option<usize>,
    docs_base: Option<String>,
    cancellation: Option<CancellationToken>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds multiple boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the entity lineage roots.
    #[must_use]
    pub fn lineage_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lineage_roots = Some(roots.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the number of worker threads (default: rayon's global pool).
    #[must_use]
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Sets the prefix joined onto remediation references.
    #[must_use]
    pub fn docs_base(mut self, base: impl Into<String>) -> Self {
        self.docs_base = Some(base.into());
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid exclude globs, duplicate rule names, zero
    /// parallelism, or a worker pool that cannot be created.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name()) {
                return Err(AnalyzerError::DuplicateRule {
                    name: rule.name().to_string(),
                });
            }
        }

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.engine.exclude.iter().cloned());
        let exclude = ExcludeSet::new(&exclude_patterns)?;

        let lineage = Lineage::new(
            self.lineage_roots
                .unwrap_or_else(|| config.engine.lineage_roots.clone()),
        );

        let pool = match self.parallelism.or(config.engine.parallelism) {
            Some(0) => return Err(AnalyzerError::InvalidParallelism),
            Some(workers) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("arch-conform-{i}"))
                    .build()?,
            ),
            None => None,
        };

        let docs_base = self
            .docs_base
            .unwrap_or_else(|| config.engine.docs_base.clone());

        Ok(Analyzer {
            rules: self.rules,
            exclude,
            config,
            lineage,
            docs_base,
            pool,
            cancellation: self.cancellation.unwrap_or_default(),
        })
    }
}

/// The Rule Runner.
///
/// Use [`Analyzer::builder()`] to construct an instance. One analyzer can
/// run any number of workspaces; nothing is carried over between runs.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    exclude: ExcludeSet,
    config: Config,
    lineage: Lineage,
    docs_base: String,
    pool: Option<rayon::ThreadPool>,
    cancellation: CancellationToken,
}

/// What one type's evaluation produced.
#[derive(Default)]
struct TypeOutcome {
    violations: Vec<Violation>,
    errors: Vec<RuleError>,
    skipped: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configured lineage.
    #[must_use]
    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    /// Returns the cancellation token observed by this analyzer.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }

    /// Loads every snapshot under `root` and analyzes the resulting workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if snapshots cannot be discovered or parsed.
    pub fn analyze_snapshots(&self, root: &Path) -> Result<Report, AnalyzerError> {
        let workspace = SnapshotLoader::new()
            .respect_gitignore(self.config.engine.respect_gitignore)
            .load(root)?;
        Ok(self.analyze(&workspace))
    }

    /// Analyzes a workspace.
    ///
    /// The inheritance index is built first, sequentially. The (type, rule)
    /// grid is then evaluated in parallel; faults in one pair are recorded as
    /// rule errors and never stop the run. Every output list is sorted, so the
    /// report does not depend on parallelism or rule registration order.
    #[must_use]
    pub fn analyze(&self, workspace: &Workspace) -> Report {
        info!(
            "Starting analysis of {} project(s), {} type(s)",
            workspace.projects().len(),
            workspace.type_count()
        );

        let (index, resolution_warnings) = WorkspaceIndex::build(workspace);
        info!(
            "Inheritance index built: {} subtyped name(s)",
            index.inheritance().len()
        );

        let rules: Vec<&dyn Rule> = self
            .rules
            .iter()
            .map(|rule| rule.as_ref())
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        let targets: Vec<(&str, &TypeDecl, Option<&TypeDecl>)> = workspace
            .declarations()
            .filter(|(project, decl, _)| index.is_resolved(project, decl))
            .filter(|(_, decl, _)| {
                let excluded = self.exclude.matches(&decl.file);
                if excluded {
                    debug!("Excluding: {}", decl.qualified_name());
                }
                !excluded
            })
            .collect();

        let evaluate = || -> Vec<TypeOutcome> {
            targets
                .par_iter()
                .map(|&(project, decl, container)| {
                    let symbol = TypeSymbol::new(project, decl, container, &index);
                    self.evaluate_type(symbol, &rules)
                })
                .collect()
        };
        let outcomes = match &self.pool {
            Some(pool) => pool.install(evaluate),
            None => evaluate(),
        };

        let mut report = Report::new();
        report.types_checked = targets.len();
        report.resolution_warnings = resolution_warnings;
        for outcome in outcomes {
            report.violations.extend(outcome.violations);
            report.rule_errors.extend(outcome.errors);
            report.cancelled |= outcome.skipped;
        }
        report.violations.sort();
        report.rule_errors.sort();

        if report.cancelled {
            warn!("Analysis cancelled before all rules ran");
        }
        info!(
            "Analysis complete: {} violation(s), {} rule error(s) in {} type(s)",
            report.violations.len(),
            report.rule_errors.len(),
            report.types_checked
        );

        report
    }

    /// Evaluates every rule on one type.
    fn evaluate_type(&self, symbol: TypeSymbol<'_>, rules: &[&dyn Rule]) -> TypeOutcome {
        let ctx = RuleContext::new(symbol, &self.lineage, &self.docs_base);
        let mut outcome = TypeOutcome::default();

        for rule in rules {
            if self.cancellation.is_cancelled() {
                outcome.skipped = true;
                break;
            }

            match catch_unwind(AssertUnwindSafe(|| rule.evaluate(&ctx))) {
                Ok(Ok(Some(mut violation))) => {
                    if let Some(severity) = self.config.rule_severity(rule.name()) {
                        violation.severity = severity;
                    }
                    outcome.violations.push(violation);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    warn!("Rule {} failed on {}: {}", rule.name(), symbol.fqn(), e);
                    outcome.errors.push(rule_error(*rule, &symbol, e.to_string()));
                }
                Err(payload) => {
                    let cause = panic_message(payload.as_ref());
                    warn!("Rule {} panicked on {}: {}", rule.name(), symbol.fqn(), cause);
                    outcome
                        .errors
                        .push(rule_error(*rule, &symbol, format!("panicked: {cause}")));
                }
            }
        }

        outcome
    }
}

fn rule_error(rule: &dyn Rule, symbol: &TypeSymbol<'_>, cause: String) -> RuleError {
    RuleError {
        rule: rule.name().to_string(),
        project: symbol.project().to_string(),
        type_name: symbol.fqn().to_string(),
        cause,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
