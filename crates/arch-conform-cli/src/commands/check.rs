//! Check command implementation.

use anyhow::{Context, Result};
use arch_conform_core::{Analyzer, RuleBox};
use arch_conform_rules::{all_rules, rules_from_config};
use std::process::ExitCode;

use crate::config_resolver::ResolvedConfig;
use crate::OutputFormat;

/// Exit code when a violation at or above `fail_on` was found.
const EXIT_VIOLATIONS: u8 = 1;
/// Exit code when a rule failed to execute.
const EXIT_RULE_ERRORS: u8 = 2;

/// Runs the check command.
pub fn run(
    resolved: ResolvedConfig,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
) -> Result<ExitCode> {
    let ResolvedConfig {
        source,
        config,
        snapshots,
    } = resolved;
    tracing::debug!("Config source: {:?}", source);
    let fail_on = config
        .fail_on_severity()
        .context("Invalid fail_on in config")?;

    let rules = match rules_filter {
        Some(filter) => {
            let wanted: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&wanted)
        }
        None => rules_from_config(&config),
    };

    let analyzer = Analyzer::builder()
        .config(config)
        .excludes(exclude)
        .rules(rules)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Checking snapshots under {} with {} rules",
        snapshots.display(),
        analyzer.rule_count()
    );

    let report = analyzer
        .analyze_snapshots(&snapshots)
        .with_context(|| format!("Failed to analyze {}", snapshots.display()))?;

    for warning in &report.resolution_warnings {
        tracing::debug!("{}", warning);
    }

    super::output::print(&report, format)?;

    if report.has_rule_errors() {
        return Ok(ExitCode::from(EXIT_RULE_ERRORS));
    }
    if report.has_violations_at(fail_on) {
        return Ok(ExitCode::from(EXIT_VIOLATIONS));
    }
    Ok(ExitCode::SUCCESS)
}

/// Selects catalog rules by name or code, in catalog order.
fn filter_rules(wanted: &[&str]) -> Vec<RuleBox> {
    for name in wanted {
        if !all_rules()
            .iter()
            .any(|rule| rule.name() == *name || rule.code() == *name)
        {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    all_rules()
        .into_iter()
        .filter(|rule| {
            wanted
                .iter()
                .any(|name| rule.name() == *name || rule.code() == *name)
        })
        .collect()
}
