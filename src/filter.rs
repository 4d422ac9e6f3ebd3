//! Case-insensitive keyword matching across platform text fields.

/// A keyword lowered once and matched as a substring against any number of
/// candidate fields. The empty keyword matches everything.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    needle: String,
}

impl KeywordFilter {
    pub fn new(keyword: &str) -> Self {
        Self {
            needle: keyword.to_lowercase(),
        }
    }

    /// Whether the keyword appears (case-insensitively) in at least one of
    /// the given fields.
    pub fn matches_any<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.needle.is_empty() {
            return true;
        }
        fields
            .into_iter()
            .any(|f| f.to_lowercase().contains(&self.needle))
    }
}
