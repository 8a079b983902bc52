//! Reference to a downloadable edition.

use std::fmt;

use url::Url;

/// Absolute URL of the full-edition PDF for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionReference(Url);

impl EditionReference {
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EditionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
