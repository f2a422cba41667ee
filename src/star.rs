// Star record model.
// The normalized, searchable fields of one starred repository.

use serde::{Deserialize, Serialize};

/// One repository a user has starred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRecord {
    /// `owner/repo`, unique within a cache entry.
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub html_url: String,
}

impl StarRecord {
    pub fn new(full_name: impl Into<String>, html_url: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            description: String::new(),
            language: String::new(),
            topics: Vec::new(),
            html_url: html_url.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set topics, dropping duplicates while keeping first-seen order.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics.clear();
        for topic in topics {
            let topic = topic.into();
            if !self.topics.contains(&topic) {
                self.topics.push(topic);
            }
        }
        self
    }

    /// All searchable text joined into one blob.
    ///
    /// Fields are separated by a single space, so a keyword may span two
    /// adjacent fields.
    pub fn searchable_text(&self) -> String {
        let mut blob = String::with_capacity(
            self.full_name.len() + self.description.len() + self.language.len() + 16,
        );
        blob.push_str(&self.full_name);
        for field in [&self.description, &self.language]
            .into_iter()
            .chain(self.topics.iter())
        {
            blob.push(' ');
            blob.push_str(field);
        }
        blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searchable_text_includes_every_field() {
        let record = StarRecord::new("rust-lang/rust", "https://github.com/rust-lang/rust")
            .with_description("Empowering everyone")
            .with_language("Rust")
            .with_topics(["compiler", "language"]);

        let blob = record.searchable_text();
        assert_eq!(blob, "rust-lang/rust Empowering everyone Rust compiler language");
        assert!(!blob.contains("https://"));
    }

    #[test]
    fn test_topics_deduplicated() {
        let record = StarRecord::new("a/b", "u").with_topics(["cli", "rust", "cli"]);
        assert_eq!(record.topics, vec!["cli", "rust"]);
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let json = r#"{"fullName":"a/b","htmlUrl":"https://github.com/a/b"}"#;
        let record: StarRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, StarRecord::new("a/b", "https://github.com/a/b"));
    }

    #[test]
    fn test_missing_full_name_is_rejected() {
        let json = r#"{"description":"x","htmlUrl":"https://github.com/a/b"}"#;
        assert!(serde_json::from_str::<StarRecord>(json).is_err());
    }
}
