//! # arch-conform-core
//!
//! Core framework for architecture conformance checking over exported
//! symbol snapshots.
//!
//! This crate provides the foundational types for building conformance
//! rules. It includes:
//!
//! - the Symbol Model ([`model`]): declared types, members, lazily parsed
//!   body trees and the once-built workspace index
//! - [`Rule`] trait and [`Eligibility`] filters
//! - [`Analyzer`], the Rule Runner
//! - [`Violation`] and [`Report`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use arch_conform_core::{Analyzer, SnapshotLoader};
//!
//! let workspace = SnapshotLoader::new().load("./build/symbols".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let report = analyzer.analyze(&workspace);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod cancel;
mod config;
mod context;
mod error;
mod lineage;
mod rule;
mod snapshot;
mod types;

/// The Symbol Model.
pub mod model;
/// Utility modules for rule implementations.
pub mod utils;

/// In-memory model builders for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use cancel::CancellationToken;
pub use config::{Config, ConfigError, EngineConfig, RuleConfig};
pub use context::RuleContext;
pub use error::ModelError;
pub use lineage::{Lineage, DEFAULT_LINEAGE_ROOTS};
pub use model::{TypeSymbol, Workspace};
pub use rule::{Eligibility, Rule, RuleBox};
pub use snapshot::{parse_snapshot, SnapshotError, SnapshotLoader, SNAPSHOT_SUFFIX};
pub use types::{
    FixAction, Location, RemediationHint, Report, ResolutionFailure, ResolutionWarning,
    RuleError, Severity, UnknownSeverity, Violation, ViolationDiagnostic,
};
