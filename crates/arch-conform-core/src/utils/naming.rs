//! Name-pattern matching on member and type identifiers.
//!
//! Conventions are expressed as prefixes and suffixes on PascalCase names
//! (`Change{X}`, `{X}Internal`, `Validate{X}`). A prefix only matches at a
//! word boundary, so `Changeling` is not a `Change*` method.

/// A prefix and/or suffix a name must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePattern {
    prefix: &'static str,
    suffix: &'static str,
}

impl NamePattern {
    /// Names starting with `prefix` at a word boundary.
    #[must_use]
    pub const fn prefix(prefix: &'static str) -> Self {
        Self { prefix, suffix: "" }
    }

    /// Names ending with `suffix` (the suffix starts a new word).
    #[must_use]
    pub const fn suffix(suffix: &'static str) -> Self {
        Self { prefix: "", suffix }
    }

    /// Names wrapped by both.
    #[must_use]
    pub const fn wrapped(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// Returns true if `name` matches.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.capture(name).is_some()
    }

    /// Returns the part of `name` between prefix and suffix, or `None` if the
    /// name does not match. The captured part may be empty (`Change` for `Change*`).
    #[must_use]
    pub fn capture<'n>(&self, name: &'n str) -> Option<&'n str> {
        let rest = name.strip_prefix(self.prefix)?;
        if !self.prefix.is_empty() && !starts_word(rest) {
            return None;
        }
        let middle = rest.strip_suffix(self.suffix)?;
        if self.prefix.is_empty() && middle.is_empty() {
            return None;
        }
        Some(middle)
    }
}

/// True when `rest` is empty or begins a new PascalCase word.
fn starts_word(rest: &str) -> bool {
    rest.chars()
        .next()
        .map_or(true, |c| c.is_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Returns true for names like `IRepository`: `I` followed by an uppercase letter.
#[must_use]
pub fn has_capability_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_respects_word_boundary() {
        let change = NamePattern::prefix("Change");
        assert_eq!(change.capture("ChangeName"), Some("Name"));
        assert_eq!(change.capture("Change"), Some(""));
        assert!(!change.matches("Changeling"));
        assert!(!change.matches("Rename"));
    }

    #[test]
    fn suffix_requires_stem() {
        let internal = NamePattern::suffix("Internal");
        assert_eq!(internal.capture("ChangeNameInternal"), Some("ChangeName"));
        assert!(!internal.matches("Internal"));
        assert!(!internal.matches("ChangeName"));
    }

    #[test]
    fn wrapped_captures_middle() {
        let companion = NamePattern::wrapped("Change", "Internal");
        assert_eq!(companion.capture("ChangeNameInternal"), Some("Name"));
        assert!(!companion.matches("ChangeName"));
    }

    #[test]
    fn capability_prefix() {
        assert!(has_capability_prefix("IRepository"));
        assert!(!has_capability_prefix("Item"));
        assert!(!has_capability_prefix("I"));
        assert!(!has_capability_prefix("Repository"));
    }
}
