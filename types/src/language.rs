//! Declared content type of an editor document.

use std::path::Path;

/// Language identifier an editor attaches to a document (e.g. "proto3").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentLanguage(String);

impl DocumentLanguage {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Guess the language from a file extension, the way editors do for
    /// files without an explicit mode. Unknown extensions map to "plaintext".
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let id = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("proto") => "proto",
            _ => "plaintext",
        };
        Self::new(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier contains `marker` (e.g. "proto" matches "proto3").
    #[must_use]
    pub fn matches_marker(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }
}

impl From<&str> for DocumentLanguage {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
