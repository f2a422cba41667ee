// Keyword matching over star records.
// Boolean substring inclusion with AND/OR composition and optional case folding.

use crate::star::StarRecord;

/// How multiple keywords combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// A record matches when any keyword occurs.
    #[default]
    Any,
    /// A record matches only when every keyword occurs.
    All,
}

/// A keyword filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    keywords: Vec<String>,
    mode: MatchMode,
    case_sensitive: bool,
}

impl Query {
    pub fn new(keywords: Vec<String>, mode: MatchMode, case_sensitive: bool) -> Self {
        // Fold once here rather than per record.
        let keywords = if case_sensitive {
            keywords
        } else {
            keywords.iter().map(|k| fold_case(k)).collect()
        };

        Self {
            keywords,
            mode,
            case_sensitive,
        }
    }

    /// Keywords as they are compared (lowercased when case-insensitive).
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// True when the query has no keywords and passes every record through.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Test a single record.
    pub fn matches(&self, record: &StarRecord) -> bool {
        if self.keywords.is_empty() {
            return true;
        }

        let mut blob = record.searchable_text();
        if !self.case_sensitive {
            blob = fold_case(&blob);
        }

        let mut hits = self.keywords.iter().map(|k| blob.contains(k.as_str()));
        match self.mode {
            MatchMode::Any => hits.any(|hit| hit),
            MatchMode::All => hits.all(|hit| hit),
        }
    }
}

/// Lowercase `text` one character at a time.
///
/// Unlike `str::to_lowercase` this ignores context (Greek final sigma), so a
/// folded keyword always lines up with the same characters in folded text.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Filter `records` by `keywords`, preserving order.
///
/// An empty keyword list returns every record.
pub fn filter_records(
    records: &[StarRecord],
    keywords: &[String],
    mode: MatchMode,
    case_sensitive: bool,
) -> Vec<StarRecord> {
    let query = Query::new(keywords.to_vec(), mode, case_sensitive);
    if query.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect()
}
