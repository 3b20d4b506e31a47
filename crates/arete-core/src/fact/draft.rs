use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::Confidence;
use super::kinds::{Category, FactSource, Maturity, Visibility};
use super::record::Fact;
use crate::errors::ValidationError;

/// Caller-supplied input for a new fact.
///
/// This is the boundary where malformed input (blank content) is rejected;
/// nothing reaches a store without passing through here or [`Fact::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactDraft {
    pub category: Category,
    pub content: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub maturity: Maturity,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub source: FactSource,
}

impl FactDraft {
    pub fn new(category: Category, content: impl Into<String>) -> Self {
        Self {
            category,
            content: content.into(),
            confidence: Confidence::default(),
            maturity: Maturity::default(),
            visibility: Visibility::default(),
            source: FactSource::default(),
        }
    }

    pub fn confidence(mut self, value: f64) -> Self {
        self.confidence = Confidence::new(value);
        self
    }

    pub fn maturity(mut self, maturity: Maturity) -> Self {
        self.maturity = maturity;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn source(mut self, source: FactSource) -> Self {
        self.source = source;
        self
    }

    /// Turn the draft into a fact with a fresh id and all timestamps at `now`.
    pub fn into_fact(self, now: DateTime<Utc>) -> Result<Fact, ValidationError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(Fact {
            id: uuid::Uuid::new_v4().to_string(),
            category: self.category,
            content: content.to_string(),
            confidence: self.confidence,
            maturity: self.maturity,
            visibility: self.visibility,
            source: self.source,
            last_validated: now,
            created_at: now,
            updated_at: now,
            validation_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_rejected() {
        let err = FactDraft::new(Category::Core, " \t\n").into_fact(Utc::now());
        assert_eq!(err, Err(ValidationError::EmptyContent));
    }

    #[test]
    fn content_is_trimmed_and_ids_are_unique() {
        let now = Utc::now();
        let a = FactDraft::new(Category::Focus, "  Shipping v2  ")
            .into_fact(now)
            .unwrap();
        let b = FactDraft::new(Category::Focus, "Shipping v2")
            .into_fact(now)
            .unwrap();
        assert_eq!(a.content, "Shipping v2");
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn missing_category_fails_to_parse() {
        let raw = r#"{"content": "Likes tea"}"#;
        assert!(serde_json::from_str::<FactDraft>(raw).is_err());
    }
}
