//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "arch-conform.toml";

const DEFAULT_CONFIG: &str = r#"# arch-conform configuration

# recommended | strict | minimal
preset = "recommended"

# Lowest severity that fails the run: error | warning | info
fail_on = "error"

[engine]
# Directory scanned for *.symbols.json snapshots
snapshots = "."

# Glob patterns matched against type file paths
exclude = [
    "**/Migrations/**",
    "**/Generated/**",
]

# Respect .gitignore files during snapshot discovery
respect_gitignore = true

# Worker threads (default: all cores)
# parallelism = 4

# Ancestors that make a type part of the entity lineage
lineage_roots = ["Entity", "AggregateRoot"]

# Prefix for remediation document references
# docs_base = "docs/conventions"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.max-inheritance-depth]
enabled = true
# severity = "error"
max_depth = 2

[rules.single-registration-call]
methods = ["RegisterChange"]

# [rules.no-business-exceptions]
# allowed_exceptions = ["ArgumentNullException"]

# [rules.validators-use-helper]
# helper = "ValidationHelper"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Export *.symbols.json snapshots for your projects");
    println!("  2. Edit {CONFIG_FILE} to configure rules");
    println!("  3. Run: arch-conform check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
