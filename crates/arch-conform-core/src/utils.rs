//! Utility functions for rule implementations.

pub mod naming;
pub mod paths;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use naming::NamePattern;
#[doc(inline)]
pub use paths::ExcludeSet;
