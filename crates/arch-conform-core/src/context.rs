//! Per-evaluation context handed to rules.

use crate::lineage::Lineage;
use crate::model::TypeSymbol;
use crate::rule::Rule;
use crate::types::{Location, RemediationHint, Violation};

/// Everything a rule may read while evaluating one type.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The type under evaluation.
    pub symbol: TypeSymbol<'a>,
    /// Configured entity lineage.
    pub lineage: &'a Lineage,
    /// Prefix joined onto every rule's remediation document.
    pub docs_base: &'a str,
}

impl<'a> RuleContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(symbol: TypeSymbol<'a>, lineage: &'a Lineage, docs_base: &'a str) -> Self {
        Self {
            symbol,
            lineage,
            docs_base,
        }
    }

    /// Location of `line` in the evaluated type's file.
    #[must_use]
    pub fn location(&self, line: u32) -> Location {
        Location::new(self.symbol.project(), self.symbol.file(), line)
    }

    /// Full remediation reference for `doc`.
    #[must_use]
    pub fn doc_ref(&self, doc: &str) -> String {
        if self.docs_base.is_empty() {
            doc.to_string()
        } else {
            format!("{}/{doc}", self.docs_base.trim_end_matches('/'))
        }
    }

    /// Builds a violation of `rule` at `line`, with the rule's identity,
    /// default severity and remediation reference filled in.
    #[must_use]
    pub fn violation<R: Rule + ?Sized>(
        &self,
        rule: &R,
        line: u32,
        message: impl Into<String>,
        hint: RemediationHint,
    ) -> Violation {
        Violation::new(
            rule.code(),
            rule.name(),
            rule.default_severity(),
            self.location(line),
            message,
            hint,
        )
        .with_doc_ref(self.doc_ref(rule.doc_ref()))
    }
}
