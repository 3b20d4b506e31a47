//! Shared fixtures for Arete tests: fact builders, fixed timestamps, and
//! in-memory collaborators with failure injection.

mod collaborators;

use arete_core::{Category, Confidence, Fact, FactSource, Maturity, Visibility};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub use collaborators::{MemoryArchive, MemoryLocalStore, MemoryRemoteStore};

/// Midnight UTC on the given date.
///
/// # Panics
/// Panics on an invalid calendar date.
pub fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// A stable "now" used by scenario tests.
pub fn fixed_now() -> DateTime<Utc> {
    ts(2024, 7, 1)
}

/// Builder for facts with explicit ids and timestamps.
#[derive(Debug, Clone)]
pub struct FactBuilder {
    fact: Fact,
}

impl FactBuilder {
    pub fn new(id: &str, content: &str) -> Self {
        let at = fixed_now();
        Self {
            fact: Fact {
                id: id.to_string(),
                category: Category::Expertise,
                content: content.to_string(),
                confidence: Confidence::new(0.5),
                maturity: Maturity::Candidate,
                visibility: Visibility::Trusted,
                source: FactSource::Manual,
                last_validated: at,
                created_at: at,
                updated_at: at,
                validation_count: 0,
            },
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.fact.category = category;
        self
    }

    pub fn confidence(mut self, value: f64) -> Self {
        self.fact.confidence = Confidence::new(value);
        self
    }

    pub fn maturity(mut self, maturity: Maturity) -> Self {
        self.fact.maturity = maturity;
        self
    }

    /// Set `updatedAt`, pulling `createdAt` back if needed to keep the invariant.
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.fact.updated_at = at;
        if self.fact.created_at > at {
            self.fact.created_at = at;
        }
        self
    }

    pub fn validated_at(mut self, at: DateTime<Utc>) -> Self {
        self.fact.last_validated = at;
        self
    }

    /// Validated `days` before [`fixed_now`].
    pub fn aged_days(self, days: i64) -> Self {
        self.validated_at(fixed_now() - Duration::days(days))
    }

    pub fn build(self) -> Fact {
        self.fact
    }
}

/// Shorthand for a fact with id, content, confidence, and `updatedAt`.
pub fn fact(id: &str, content: &str, confidence: f64, updated_at: DateTime<Utc>) -> Fact {
    FactBuilder::new(id, content)
        .confidence(confidence)
        .updated_at(updated_at)
        .build()
}

/// A fact with a random id.
pub fn random_fact(category: Category, content: &str) -> Fact {
    FactBuilder::new(&uuid::Uuid::new_v4().to_string(), content)
        .category(category)
        .build()
}
