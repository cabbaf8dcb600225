//! List rules command implementation.

use arch_conform_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<42} {:<8} Description",
        "Code", "Name", "Severity"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<7} {:<42} {:<8} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nPresets:");
    for preset in Preset::ALL {
        println!("  {:<12} - {} rules", preset.name(), preset.rules().len());
    }
    println!("  (recommended: every error and warning rule; strict: every rule;");
    println!("   minimal: DC001, DC030, DC031, DC060)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  arch-conform check --rules sealed-concrete-class,no-public-setters");
    println!("  arch-conform check --rules DC001,DC015,DC030");
}
