use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of fact categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Expertise,
    Preference,
    Context,
    Focus,
}

impl Category {
    /// All variants for iteration.
    pub const ALL: [Category; 5] = [
        Self::Core,
        Self::Expertise,
        Self::Preference,
        Self::Context,
        Self::Focus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Expertise => "expertise",
            Self::Preference => "preference",
            Self::Context => "context",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidentiary strength tier of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Maturity {
    /// Provisional, typically freshly inferred.
    #[default]
    Candidate,
    Established,
    /// Exempt from confidence-threshold filtering.
    Proven,
}

impl Maturity {
    pub fn is_proven(self) -> bool {
        self == Self::Proven
    }
}

/// Export/sharing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Shareable with anyone.
    Public,
    /// Shared only with trusted consumers.
    #[default]
    Trusted,
}

impl Visibility {
    /// Whether a fact with this visibility may be exported at `tier`.
    ///
    /// The trusted tier sees everything; the public tier sees only public facts.
    pub fn visible_at(self, tier: Visibility) -> bool {
        match tier {
            Visibility::Trusted => true,
            Visibility::Public => self == Visibility::Public,
        }
    }
}

/// Where a fact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactSource {
    #[default]
    Manual,
    Inferred,
    Conversation,
    Imported,
}
