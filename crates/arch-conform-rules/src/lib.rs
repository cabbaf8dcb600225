//! # arch-conform-rules
//!
//! Built-in conformance rules for arch-conform.
//!
//! Each rule inspects one declared type through the Symbol Model and reports
//! at most one violation: the first offending construct in source order.
//!
//! ## Available Rules
//!
//! | Code | Name | Applies to | Description |
//! |------|------|------------|-------------|
//! | DC001 | `sealed-concrete-class` | concrete classes | Classes nobody extends are sealed |
//! | DC002 | `no-public-fields` | all types | Public state goes through properties |
//! | DC003 | `underscore-members-private` | all types | `_name` members are private |
//! | DC004 | `internal-methods-not-public` | all types | `*Internal` methods stay in the hierarchy |
//! | DC005 | `no-public-static-mutable-state` | all types | No externally assignable static state |
//! | DC006 | `capability-name-prefix` | capabilities | Capabilities are named `I{Name}` |
//! | DC007 | `value-aggregate-immutable` | value aggregates | No assignable stored members |
//! | DC010 | `change-returns-optional-self` | entities | `Change{X}` returns `Self?` |
//! | DC011 | `factory-returns-optional-self` | entities | `Create*` returns `Self?` |
//! | DC012 | `factory-is-public-static` | entities | `Create*` is public static |
//! | DC013 | `no-public-constructors` | entities | Constructors are not externally visible |
//! | DC014 | `requires-copy-constructor` | entities | A `T(T source)` constructor exists |
//! | DC015 | `no-public-setters` | entities | Setters are not externally visible |
//! | DC016 | `encapsulated-collections` | entities | Collections are exposed read-only |
//! | DC017 | `collection-fields-private` | entities | Collection fields are private |
//! | DC020 | `non-short-circuit-validation` | entities | Validators use `&`/`\|` |
//! | DC021 | `no-business-exceptions` | entities | Only argument guards throw |
//! | DC022 | `locked-metadata-customization` | entities | `Customize*` writes under a lock |
//! | DC023 | `validators-use-helper` | entities | Validators call the shared helper |
//! | DC024 | `change-clones-self` | entities | `Change{X}` mutates a copy |
//! | DC025 | `no-ambient-clock` | entities | No `DateTime.Now` |
//! | DC030 | `change-has-internal` | entities | `Change{X}` delegates to `*Internal` |
//! | DC031 | `single-registration-call` | entities | One registration per public method |
//! | DC032 | `change-has-validator` | entities | `Change{X}` has `Validate{X}` |
//! | DC033 | `internal-methods-reachable` | entities | `*Internal` methods are called |
//! | DC040 | `metadata-member-naming` | entities | Metadata names use the suffix vocabulary |
//! | DC041 | `metadata-property-exists` | entities | Metadata refers to declared properties |
//! | DC042 | `metadata-nested` | entities | Metadata is nested, not a sibling |
//! | DC043 | `metadata-no-static-initializer` | entities | No static constructor in metadata |
//! | DC044 | `metadata-members-public-static` | entities | Metadata is static with public static members |
//! | DC045 | `validated-entity-has-metadata` | entities | Validated entities have metadata |
//! | DC050 | `max-inheritance-depth` | lineage | Limits abstract tiers |
//! | DC060 | `abstract-tier-validate-orchestrator` | abstract tiers | `public static Validate(T, ...)` exists |
//! | DC061 | `abstract-tier-extension-points-protected` | abstract tiers | Extension points are protected |
//! | DC062 | `abstract-tier-no-public-instance-methods` | abstract tiers | No public instance methods |
//! | DC063 | `abstract-tier-validators-public-static` | abstract tiers | Validators are public static |
//! | DC064 | `abstract-tier-protected-constructors` | abstract tiers | Constructors are protected |
//!
//! ## Usage
//!
//! ```ignore
//! use arch_conform_core::Analyzer;
//! use arch_conform_rules::{ChangeHasInternal, SealedConcreteClass};
//!
//! let analyzer = Analyzer::builder()
//!     .rule(SealedConcreteClass::new())
//!     .rule(ChangeHasInternal::new())
//!     .build()?;
//! let report = analyzer.analyze_snapshots("./snapshots")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod detectors;

mod abstract_tier;
mod clone_and_replace;
mod collections;
mod controlled_mutation;
mod inheritance_depth;
mod member_visibility;
mod metadata_customization;
mod metadata_naming;
mod metadata_shape;
mod mutation_companions;
mod no_ambient_clock;
mod no_business_exceptions;
mod presets;
mod sealed_class;
mod single_registration_call;
mod type_shape;
mod validation_bodies;

pub use abstract_tier::{
    AbstractTierExtensionPointsProtected, AbstractTierNoPublicInstanceMethods,
    AbstractTierProtectedConstructors, AbstractTierValidateOrchestrator,
    AbstractTierValidatorsPublicStatic,
};
pub use clone_and_replace::ChangeClonesSelf;
pub use collections::{CollectionFieldsPrivate, EncapsulatedCollections};
pub use controlled_mutation::{
    ChangeReturnsOptionalSelf, FactoryIsPublicStatic, FactoryReturnsOptionalSelf,
    NoPublicConstructors, NoPublicSetters, RequiresCopyConstructor,
};
pub use inheritance_depth::MaxInheritanceDepth;
pub use member_visibility::{
    InternalMethodsNotPublic, NoPublicFields, NoPublicStaticMutableState,
    UnderscoreMembersPrivate,
};
pub use metadata_customization::LockedMetadataCustomization;
pub use metadata_naming::{MetadataMemberNaming, MetadataPropertyExists};
pub use metadata_shape::{
    MetadataMembersPublicStatic, MetadataNested, MetadataNoStaticInitializer,
    ValidatedEntityHasMetadata,
};
pub use mutation_companions::{ChangeHasInternal, ChangeHasValidator, InternalMethodsReachable};
pub use no_ambient_clock::NoAmbientClock;
pub use no_business_exceptions::NoBusinessExceptions;
pub use presets::{
    all_rules, minimal_rules, recommended_rules, rules_from_config, strict_rules, Preset,
};
pub use sealed_class::SealedConcreteClass;
pub use single_registration_call::SingleRegistrationCall;
pub use type_shape::{CapabilityNamePrefix, ValueAggregateImmutable};
pub use validation_bodies::{NonShortCircuitValidation, ValidatorsUseHelper};

/// Re-export core types for convenience.
pub use arch_conform_core::{Rule, Severity, Violation};
