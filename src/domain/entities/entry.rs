//! Entry entity: one matching line of a gazette edition.

use serde::Serialize;

/// Section label attached to every entry read from a Section 3 edition.
pub const SECTION_LABEL: &str = "Seção 3";

/// A line of the document that mentions both the target name and the keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// 1-based page number.
    pub page: u32,
    pub text: String,
    pub section: String,
}

impl Entry {
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
            section: SECTION_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_defaults_to_section_three() {
        let entry = Entry::new(3, "Convocação de FULANO");
        assert_eq!(entry.page, 3);
        assert_eq!(entry.section, "Seção 3");
    }
}
