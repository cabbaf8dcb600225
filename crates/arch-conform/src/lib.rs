//! # arch-conform
//!
//! Architecture conformance checks for domain models exported as symbol
//! snapshots.
//!
//! This is the main facade crate that re-exports the engine and the rule
//! catalog.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! arch-conform = "0.3"
//! ```
//!
//! ```rust,ignore
//! // tests/architecture.rs
//! arch_conform::check!();
//! ```
//!
//! This loads every `*.symbols.json` under the configured snapshot directory
//! and fails the test when a violation reaches `fail_on`. Configure via
//! `arch-conform.toml`; macro arguments override the file:
//!
//! ```rust,ignore
//! arch_conform::check!(preset = "strict", fail_on = "warning");
//! arch_conform::check!(config = "ci/arch-conform.toml");
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use arch_conform::Analyzer;
//! use arch_conform::rules::recommended_rules;
//!
//! let analyzer = Analyzer::builder()
//!     .rules(recommended_rules())
//!     .build()?;
//!
//! let report = analyzer.analyze_snapshots("./snapshots".as_ref())?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use arch_conform_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use arch_conform_rules::*;
}

mod runner;

#[doc(hidden)]
pub mod __internal {
    pub use crate::runner::{run_check, CheckOptions};
}

/// Generates a `#[test]` that runs the conformance checks.
///
/// Accepted arguments, all optional and in any order:
/// `preset = "..."`, `config = "..."` (relative to the workspace root) and
/// `fail_on = "..."`.
#[macro_export]
macro_rules! check {
    ($($key:ident = $value:literal),* $(,)?) => {
        #[test]
        fn arch_conform_check() {
            let options = $crate::__internal::CheckOptions::default()
                $(.set(stringify!($key), $value))*;
            $crate::__internal::run_check(&options);
        }
    };
}
