//! Rule presets and construction from configuration.

use arch_conform_core::{Config, RuleBox, Severity};
use tracing::{debug, warn};

use crate::{
    AbstractTierExtensionPointsProtected, AbstractTierNoPublicInstanceMethods,
    AbstractTierProtectedConstructors, AbstractTierValidateOrchestrator,
    AbstractTierValidatorsPublicStatic, CapabilityNamePrefix, ChangeClonesSelf, ChangeHasInternal,
    ChangeHasValidator, ChangeReturnsOptionalSelf, CollectionFieldsPrivate,
    EncapsulatedCollections, FactoryIsPublicStatic, FactoryReturnsOptionalSelf,
    InternalMethodsNotPublic, InternalMethodsReachable, LockedMetadataCustomization,
    MaxInheritanceDepth, MetadataMemberNaming, MetadataMembersPublicStatic, MetadataNested,
    MetadataNoStaticInitializer, MetadataPropertyExists, NoAmbientClock, NoBusinessExceptions,
    NoPublicConstructors, NoPublicFields, NoPublicSetters, NoPublicStaticMutableState,
    NonShortCircuitValidation, RequiresCopyConstructor, SealedConcreteClass,
    SingleRegistrationCall, UnderscoreMembersPrivate, ValidatedEntityHasMetadata,
    ValidatorsUseHelper, ValueAggregateImmutable,
};

/// Preset configurations for arch-conform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every error and warning rule.
    Recommended,
    /// Every rule, informational ones raised to warnings.
    Strict,
    /// Core conventions only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 3] = [Self::Recommended, Self::Strict, Self::Minimal];

    /// Returns the preset named `name`, if any.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Configuration name of the preset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Returns the rules for this preset with default options.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        self.rules_with(&Options::default())
    }

    fn rules_with(self, options: &Options) -> Vec<RuleBox> {
        match self {
            Self::Recommended => catalog(options)
                .into_iter()
                .filter(|rule| rule.default_severity() > Severity::Info)
                .collect(),
            Self::Strict => strict(options),
            Self::Minimal => vec![
                Box::new(SealedConcreteClass::new()),
                Box::new(ChangeHasInternal::new()),
                Box::new(options.single_registration_call()),
                Box::new(AbstractTierValidateOrchestrator::new()),
            ],
        }
    }
}

/// Rule options read from `[rules.<name>]` tables.
#[derive(Debug, Clone, Default)]
struct Options {
    max_depth: Option<usize>,
    registration_methods: Option<Vec<String>>,
    validation_helper: Option<String>,
    allowed_exceptions: Option<Vec<String>>,
}

impl Options {
    fn from_config(config: &Config) -> Self {
        let non_empty = |values: Vec<String>| (!values.is_empty()).then_some(values);

        Self {
            max_depth: config
                .rule(MaxInheritanceDepth::NAME)
                .and_then(|c| c.get_option::<i64>("max_depth"))
                .and_then(|depth| usize::try_from(depth).ok()),
            registration_methods: config
                .rule(SingleRegistrationCall::NAME)
                .and_then(|c| non_empty(c.get_str_array("methods"))),
            validation_helper: config
                .rule(ValidatorsUseHelper::NAME)
                .and_then(|c| c.get_option::<String>("helper")),
            allowed_exceptions: config
                .rule(NoBusinessExceptions::NAME)
                .and_then(|c| non_empty(c.get_str_array("allowed_exceptions"))),
        }
    }

    fn max_inheritance_depth(&self) -> MaxInheritanceDepth {
        match self.max_depth {
            Some(depth) => MaxInheritanceDepth::new().max_depth(depth),
            None => MaxInheritanceDepth::new(),
        }
    }

    fn single_registration_call(&self) -> SingleRegistrationCall {
        match &self.registration_methods {
            Some(methods) => SingleRegistrationCall::new().methods(methods.clone()),
            None => SingleRegistrationCall::new(),
        }
    }

    fn validators_use_helper(&self) -> ValidatorsUseHelper {
        match &self.validation_helper {
            Some(helper) => ValidatorsUseHelper::new().helper(helper.clone()),
            None => ValidatorsUseHelper::new(),
        }
    }

    fn no_business_exceptions(&self) -> NoBusinessExceptions {
        match &self.allowed_exceptions {
            Some(allowed) => NoBusinessExceptions::new().allowed_exceptions(allowed.clone()),
            None => NoBusinessExceptions::new(),
        }
    }
}

/// Every rule in code order, at default severity.
fn catalog(options: &Options) -> Vec<RuleBox> {
    vec![
        Box::new(SealedConcreteClass::new()),
        Box::new(NoPublicFields::new()),
        Box::new(UnderscoreMembersPrivate::new()),
        Box::new(InternalMethodsNotPublic::new()),
        Box::new(NoPublicStaticMutableState::new()),
        Box::new(CapabilityNamePrefix::new()),
        Box::new(ValueAggregateImmutable::new()),
        Box::new(ChangeReturnsOptionalSelf::new()),
        Box::new(FactoryReturnsOptionalSelf::new()),
        Box::new(FactoryIsPublicStatic::new()),
        Box::new(NoPublicConstructors::new()),
        Box::new(RequiresCopyConstructor::new()),
        Box::new(NoPublicSetters::new()),
        Box::new(EncapsulatedCollections::new()),
        Box::new(CollectionFieldsPrivate::new()),
        Box::new(NonShortCircuitValidation::new()),
        Box::new(options.no_business_exceptions()),
        Box::new(LockedMetadataCustomization::new()),
        Box::new(options.validators_use_helper()),
        Box::new(ChangeClonesSelf::new()),
        Box::new(NoAmbientClock::new()),
        Box::new(ChangeHasInternal::new()),
        Box::new(options.single_registration_call()),
        Box::new(ChangeHasValidator::new()),
        Box::new(InternalMethodsReachable::new()),
        Box::new(MetadataMemberNaming::new()),
        Box::new(MetadataPropertyExists::new()),
        Box::new(MetadataNested::new()),
        Box::new(MetadataNoStaticInitializer::new()),
        Box::new(MetadataMembersPublicStatic::new()),
        Box::new(ValidatedEntityHasMetadata::new()),
        Box::new(options.max_inheritance_depth()),
        Box::new(AbstractTierValidateOrchestrator::new()),
        Box::new(AbstractTierExtensionPointsProtected::new()),
        Box::new(AbstractTierNoPublicInstanceMethods::new()),
        Box::new(AbstractTierValidatorsPublicStatic::new()),
        Box::new(AbstractTierProtectedConstructors::new()),
    ]
}

fn strict(options: &Options) -> Vec<RuleBox> {
    catalog(options)
        .into_iter()
        .map(|rule| -> RuleBox {
            if rule.default_severity() != Severity::Info {
                return rule;
            }
            match rule.name() {
                UnderscoreMembersPrivate::NAME => {
                    Box::new(UnderscoreMembersPrivate::new().severity(Severity::Warning))
                }
                InternalMethodsReachable::NAME => {
                    Box::new(InternalMethodsReachable::new().severity(Severity::Warning))
                }
                _ => rule,
            }
        })
        .collect()
}

/// Returns the recommended set of rules: every error and warning rule.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the strict set of rules: every rule, informational rules raised
/// to warnings.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - `sealed-concrete-class` (DC001)
/// - `change-has-internal` (DC030)
/// - `single-registration-call` (DC031)
/// - `abstract-tier-validate-orchestrator` (DC060)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}

/// Returns all available rules at their default severity.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    catalog(&Options::default())
}

/// Builds the rule set a configuration asks for: its preset (recommended
/// when unset) with rule options applied.
///
/// Enabling, disabling and severity overrides are applied by the analyzer,
/// so disabled rules are still returned here.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            warn!("Unknown preset '{}', using recommended", name);
            Preset::Recommended
        }),
    };
    debug!("Using preset {}", preset.name());
    preset.rules_with(&Options::from_config(config))
}
