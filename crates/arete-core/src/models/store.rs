use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::errors::ValidationError;
use crate::fact::Fact;

/// Small structured profile kept next to the facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreProfile {
    pub name: Option<String>,
    pub role: Option<String>,
}

impl CoreProfile {
    /// Field-wise fill: keep our non-blank values, take the other side's for blanks.
    pub fn filled_from(&self, other: &CoreProfile) -> CoreProfile {
        fn pick(ours: &Option<String>, theirs: &Option<String>) -> Option<String> {
            match ours {
                Some(v) if !v.trim().is_empty() => Some(v.clone()),
                _ => theirs.clone(),
            }
        }
        CoreProfile {
            name: pick(&self.name, &other.name),
            role: pick(&self.role, &other.role),
        }
    }
}

/// Per-store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentitySettings {
    /// Confidence half-life in days.
    pub decay_half_life_days: f64,
    /// Whether the extraction pipeline may add inferred facts.
    pub auto_infer: bool,
    /// Whether reaffirmed facts climb maturity tiers automatically.
    pub auto_promote: bool,
    /// Domains the extraction pipeline must ignore.
    pub excluded_domains: Vec<String>,
}

impl IdentitySettings {
    /// Whether `domain` or any parent of it is on the exclusion list.
    /// Comparison ignores case and surrounding whitespace.
    pub fn is_domain_excluded(&self, domain: &str) -> bool {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            return false;
        }
        self.excluded_domains.iter().any(|excluded| {
            let excluded = excluded.trim().to_lowercase();
            !excluded.is_empty()
                && (domain == excluded || domain.ends_with(&format!(".{excluded}")))
        })
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            decay_half_life_days: defaults::DEFAULT_HALF_LIFE_DAYS,
            auto_infer: defaults::DEFAULT_AUTO_INFER,
            auto_promote: defaults::DEFAULT_AUTO_PROMOTE,
            excluded_domains: Vec::new(),
        }
    }
}

/// Store envelope with facts left undecoded, so one bad entry cannot
/// take the rest of the store down with it.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStore {
    core: CoreProfile,
    facts: Vec<serde_json::Value>,
    settings: IdentitySettings,
}

/// Ordered collection of facts plus profile and settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Store {
    pub core: CoreProfile,
    pub facts: Vec<Fact>,
    pub settings: IdentitySettings,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from facts with default profile and settings.
    pub fn with_facts(facts: Vec<Fact>) -> Self {
        Self {
            facts,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Fact> {
        self.facts.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Fact> {
        self.facts.iter_mut().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.facts.iter().map(|f| f.id.as_str()).collect()
    }

    /// Append a new fact. Rejects invalid facts and duplicate ids.
    pub fn insert(&mut self, fact: Fact) -> Result<(), ValidationError> {
        fact.validate()?;
        if self.contains(&fact.id) {
            return Err(ValidationError::DuplicateId { id: fact.id });
        }
        self.facts.push(fact);
        Ok(())
    }

    /// Insert or replace by id, keeping the original position on replace.
    /// Returns `true` when an existing fact was replaced.
    pub fn upsert(&mut self, fact: Fact) -> Result<bool, ValidationError> {
        fact.validate()?;
        match self.get_mut(&fact.id) {
            Some(existing) => {
                *existing = fact;
                Ok(true)
            }
            None => {
                self.facts.push(fact);
                Ok(false)
            }
        }
    }

    /// Remove a fact by id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<Fact> {
        let pos = self.facts.iter().position(|f| f.id == id)?;
        Some(self.facts.remove(pos))
    }

    /// Drop facts that violate the fact invariants or repeat an earlier id.
    /// Returns the ids (or blank markers) that were dropped.
    pub fn retain_valid(&mut self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dropped = Vec::new();
        self.facts.retain(|f| {
            let ok = f.validate().is_ok() && seen.insert(f.id.clone());
            if !ok {
                dropped.push(f.id.clone());
            }
            ok
        });
        dropped
    }

    /// Decode a store one fact at a time.
    ///
    /// Entries that fail to parse or break the fact invariants are dropped and
    /// reported by id (`#<index>` when the entry has no readable id). Only a
    /// malformed envelope is an error.
    pub fn from_json_value(value: serde_json::Value) -> Result<(Store, Vec<String>), serde_json::Error> {
        let raw: RawStore = serde_json::from_value(value)?;
        let mut facts = Vec::with_capacity(raw.facts.len());
        let mut dropped = Vec::new();
        for (index, entry) in raw.facts.into_iter().enumerate() {
            let label = entry
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| format!("#{index}"), str::to_string);
            match serde_json::from_value::<Fact>(entry) {
                Ok(fact) => facts.push(fact),
                Err(_) => dropped.push(label),
            }
        }
        let mut store = Store {
            core: raw.core,
            facts,
            settings: raw.settings,
        };
        dropped.extend(store.retain_valid());
        Ok((store, dropped))
    }

    /// Most recent `updatedAt` across all facts.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.facts.iter().map(|f| f.updated_at).max()
    }
}
