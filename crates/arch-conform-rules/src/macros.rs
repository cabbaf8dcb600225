//! Declaration macro for rules without options.

/// Declares a rule struct whose only setting is its severity.
///
/// The struct gets `CODE`/`NAME` constants, `new()`, a `severity()` builder
/// and a [`Rule`](arch_conform_core::Rule) impl that delegates detection to
/// an inherent `fn detect(&self, ctx: &RuleContext<'_>)`.
macro_rules! declare_rule {
    (
        $(#[$meta:meta])*
        $vis:vis struct $ty:ident {
            code: $code:literal,
            name: $name:literal,
            severity: $severity:ident,
            eligibility: $eligibility:ident,
            doc: $doc:literal,
            description: $description:literal $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $ty {
            severity: arch_conform_core::Severity,
        }

        impl $ty {
            /// Rule code.
            pub const CODE: &'static str = $code;

            /// Rule name.
            pub const NAME: &'static str = $name;

            /// Creates the rule with its default severity.
            #[must_use]
            pub fn new() -> Self {
                Self {
                    severity: arch_conform_core::Severity::$severity,
                }
            }

            /// Sets the severity level.
            #[must_use]
            pub fn severity(mut self, severity: arch_conform_core::Severity) -> Self {
                self.severity = severity;
                self
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl arch_conform_core::Rule for $ty {
            fn name(&self) -> &'static str {
                Self::NAME
            }

            fn code(&self) -> &'static str {
                Self::CODE
            }

            fn description(&self) -> &'static str {
                $description
            }

            fn default_severity(&self) -> arch_conform_core::Severity {
                self.severity
            }

            fn eligibility(&self) -> arch_conform_core::Eligibility {
                arch_conform_core::Eligibility::$eligibility
            }

            fn doc_ref(&self) -> &'static str {
                $doc
            }

            fn check(
                &self,
                ctx: &arch_conform_core::RuleContext<'_>,
            ) -> Result<Option<arch_conform_core::Violation>, arch_conform_core::ModelError> {
                self.detect(ctx)
            }
        }
    };
}
