use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::Confidence;
use super::kinds::{Category, FactSource, Maturity, Visibility};
use crate::constants::{PROMOTE_TO_ESTABLISHED_AT, PROMOTE_TO_PROVEN_AT};
use crate::errors::ValidationError;

/// A single durable statement about the user.
///
/// Serialized as camelCase JSON; this is the shape shared with the remote
/// store and the archive batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    /// UUID v4 identifier, never reused.
    pub id: String,
    pub category: Category,
    /// Trimmed natural-language statement.
    pub content: String,
    /// Declared certainty at creation or last validation.
    pub confidence: Confidence,
    #[serde(default)]
    pub maturity: Maturity,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub source: FactSource,
    pub last_validated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub validation_count: u32,
}

impl Fact {
    /// Check the invariants a fact must hold before it may enter a store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        if self.updated_at < self.created_at {
            return Err(ValidationError::TimestampOrder {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Record that the fact was reaffirmed at `now`.
    ///
    /// With `auto_promote`, maturity climbs one tier when the validation count
    /// reaches the promotion threshold for the current tier.
    pub fn reaffirm(&mut self, now: DateTime<Utc>, auto_promote: bool) {
        self.validation_count = self.validation_count.saturating_add(1);
        self.last_validated = now;
        self.updated_at = now.max(self.created_at);

        if auto_promote {
            self.maturity = match self.maturity {
                Maturity::Candidate if self.validation_count >= PROMOTE_TO_ESTABLISHED_AT => {
                    Maturity::Established
                }
                Maturity::Established if self.validation_count >= PROMOTE_TO_PROVEN_AT => {
                    Maturity::Proven
                }
                current => current,
            };
        }
    }

    /// Replace the statement text, bumping `updatedAt`.
    pub fn revise(&mut self, content: &str, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        self.content = trimmed.to_string();
        self.updated_at = now.max(self.created_at);
        Ok(())
    }
}
