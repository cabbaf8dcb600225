//! Nested metadata declarations and their naming vocabulary.
//!
//! A concrete entity carries its validation limits in a nested static
//! `Metadata` type whose members are named `{Property}{Suffix}`, for example
//! `TitleMaxLength` or `GracePeriodInDaysMax`.

use arch_conform_core::model::{DeclarationSite, Member, TypeSymbol};

/// Recognised constraint suffixes.
pub const SUFFIXES: &[&str] = &[
    "IsRequired",
    "Required",
    "MinLength",
    "MaxLength",
    "Pattern",
    "MinValue",
    "MaxValue",
    "MinCount",
    "MaxCount",
    "Precision",
    "Scale",
    "DefaultValue",
    "Min",
    "Max",
    "InDaysMin",
    "InDaysMax",
    "InHoursMin",
    "InHoursMax",
    "InMinutesMin",
    "InMinutesMax",
    "InSecondsMin",
    "InSecondsMax",
];

/// Name of the nested metadata type.
pub const METADATA_TYPE: &str = "Metadata";

/// Splits a metadata member name into `(property, suffix)`.
///
/// Suffixes are tried longest first, so `GracePeriodInDaysMax` yields
/// `("GracePeriod", "InDaysMax")` rather than `("GracePeriodInDays", "Max")`.
/// Returns `None` when no suffix matches or nothing is left for the property.
#[must_use]
pub fn decompose(name: &str) -> Option<(&str, &'static str)> {
    let mut by_length: Vec<&'static str> = SUFFIXES.to_vec();
    by_length.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    by_length.into_iter().find_map(|suffix| {
        let property = name.strip_suffix(suffix)?;
        (!property.is_empty()).then_some((property, suffix))
    })
}

/// The vocabulary as shown in messages.
#[must_use]
pub fn vocabulary() -> String {
    SUFFIXES.join(", ")
}

/// The entity's nested metadata type (`Metadata` or `{Type}Metadata`).
#[must_use]
pub fn nested_metadata<'a>(symbol: &TypeSymbol<'a>) -> Option<TypeSymbol<'a>> {
    let prefixed = format!("{}{METADATA_TYPE}", symbol.name());
    symbol
        .nested_types()
        .find(|n| n.name() == METADATA_TYPE || n.name() == prefixed)
}

/// A top-level `{Type}Metadata` declared next to the entity instead of inside it.
#[must_use]
pub fn sibling_metadata<'a>(symbol: &TypeSymbol<'a>) -> Option<&'a DeclarationSite> {
    let name = format!("{}{METADATA_TYPE}", symbol.name());
    symbol
        .index()
        .declarations_named(&name)
        .iter()
        .find(|site| site.top_level && site.project == symbol.project())
}

/// Data members of a metadata type, the ones that must follow the vocabulary.
pub fn constraint_members<'a>(metadata: &TypeSymbol<'a>) -> impl Iterator<Item = &'a Member> + 'a {
    metadata.data_members()
}
