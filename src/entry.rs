//! Typed documentation fragments.

use crate::error::MalformedEntry;
use serde::Serialize;
use std::fmt;

/// Position of an entry in its corpus. Doubles as the posting-list id.
pub type EntryId = u32;

/// Kinds of fragments the documentation generator is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Section,
    Page,
    Module,
    Function,
    Method,
    Macro,
    Type,
    Constant,
    /// Any label outside the known set.
    Other,
}

impl CategoryKind {
    fn from_key(key: &str) -> Self {
        match key {
            "section" => Self::Section,
            "page" => Self::Page,
            "module" => Self::Module,
            "function" => Self::Function,
            "method" => Self::Method,
            "macro" => Self::Macro,
            "type" => Self::Type,
            "constant" => Self::Constant,
            _ => Self::Other,
        }
    }
}

/// An open-ended category tag.
///
/// The label is kept verbatim for display; the lower-cased key is what
/// comparison, bucketing and filtering use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    label: String,
    #[serde(skip)]
    key: String,
}

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let key = label.trim().to_lowercase();
        Self { label, key }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> CategoryKind {
        CategoryKind::from_key(&self.key)
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// One documentation fragment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    location: String,
    page: String,
    title: String,
    category: Category,
    text: String,
    #[serde(skip)]
    title_lower: String,
    #[serde(skip)]
    text_lower: String,
}

impl Entry {
    /// Build an entry, rejecting an empty `location`.
    pub fn new(
        location: impl Into<String>,
        page: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, MalformedEntry> {
        let location = location.into();
        if location.is_empty() {
            return Err(MalformedEntry::missing_location());
        }

        let title = title.into();
        let text = text.into();
        Ok(Self {
            location,
            page: page.into(),
            title_lower: title.to_lowercase(),
            text_lower: text.to_lowercase(),
            title,
            category: Category::new(category),
            text,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lower-cased title, for matching only.
    pub fn title_lower(&self) -> &str {
        &self.title_lower
    }

    /// Lower-cased text, for matching only.
    pub fn text_lower(&self) -> &str {
        &self.text_lower
    }

    /// Structural entries (section separators) carry neither title nor text.
    pub fn is_structural(&self) -> bool {
        self.title.is_empty() && self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[test]
    fn empty_location_is_malformed() {
        let result = Entry::new("", "Home", "Index", "section", "");
        check!(result == Err(MalformedEntry::missing_location()));
    }

    #[test]
    fn lowered_forms_are_derived_once() {
        let_assert!(
            Ok(entry) = Entry::new(
                "#DocStringExtensions.README",
                "Home",
                "README",
                "constant",
                "An Abbreviation for including the package README.md."
            )
        );
        check!(entry.title() == "README");
        check!(entry.title_lower() == "readme");
        check!(entry.text_lower().starts_with("an abbreviation"));
        check!(!entry.is_structural());
    }

    #[rstest]
    #[case("constant", CategoryKind::Constant)]
    #[case("Method", CategoryKind::Method)]
    #[case(" MACRO ", CategoryKind::Macro)]
    #[case("keyword", CategoryKind::Other)]
    #[case("", CategoryKind::Other)]
    fn category_kind_uses_lowercased_key(#[case] label: &str, #[case] kind: CategoryKind) {
        let category = Category::new(label);
        check!(category.kind() == kind);
        check!(category.label() == label);
    }

    #[test]
    fn unknown_category_label_is_preserved() {
        let category = Category::new("Keyword");
        check!(category.to_string() == "Keyword");
        check!(category.key() == "keyword");
    }
}
