//! Errors raised while reading the Symbol Model.

use thiserror::Error;

/// A fact the Symbol Model could not provide.
///
/// Rules propagate these with `?`; the runner records them as rule
/// execution errors, never as violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A member body could not be turned into a node tree.
    #[error("malformed body of {type_name}::{member}: {message}")]
    MalformedBody {
        /// Fully-qualified name of the declaring type.
        type_name: String,
        /// Member name.
        member: String,
        /// Parse error.
        message: String,
    },

    /// The model has a shape a rule cannot interpret.
    #[error("unexpected model shape in {type_name}: {message}")]
    UnexpectedShape {
        /// Fully-qualified name of the type.
        type_name: String,
        /// What was unexpected.
        message: String,
    },
}
