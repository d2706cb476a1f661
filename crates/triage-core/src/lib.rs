//! Core domain types shared across the ticket triage workspace.
//!
//! The taxonomy (categories and priorities) is fixed at compile time. Every
//! classification that leaves this workspace is built from these enums, so a
//! value outside the taxonomy cannot be represented.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod stats;
mod ticket;

pub use stats::TicketStats;
pub use ticket::{NewTicket, Ticket, TicketError, TicketFilter, TicketPatch, TicketStatus};

/// Maximum number of characters accepted for a ticket title.
pub const MAX_TITLE_LEN: usize = 200;

/// Error returned when a string does not name a taxonomy value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    /// Which vocabulary was being parsed ("category", "priority", "status").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// =============================================================================
// Taxonomy
// =============================================================================

/// Ticket category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Billing,
    Technical,
    Account,
    #[default]
    General,
}

impl Category {
    /// Every category, in the order presented to the model.
    pub const ALL: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::General,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Technical => "technical",
            Category::Account => "account",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    /// Case-insensitive lookup; surrounding whitespace is not ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| UnknownVariant::new("category", s))
    }
}

/// Ticket priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Wire name of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == lowered)
            .ok_or_else(|| UnknownVariant::new("priority", s))
    }
}

// =============================================================================
// Classification
// =============================================================================

/// A `{category, priority}` pair assigned to a ticket description.
///
/// The `Default` value is the fallback used whenever classification cannot
/// be performed: `{general, low}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub priority: Priority,
}

impl Classification {
    /// The fixed fallback classification.
    pub const FALLBACK: Classification = Classification {
        category: Category::General,
        priority: Priority::Low,
    };

    pub fn new(category: Category, priority: Priority) -> Self {
        Self { category, priority }
    }

    /// Returns true when this is the fallback pair.
    pub fn is_fallback(&self) -> bool {
        *self == Self::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("BILLING".parse::<Category>().unwrap(), Category::Billing);
        assert_eq!("Technical".parse::<Category>().unwrap(), Category::Technical);
        assert!("bug report".parse::<Category>().is_err());
    }

    #[test]
    fn priority_parse_rejects_unknown_values() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, "priority");
        assert_eq!(err.to_string(), "unknown priority 'urgent'");
    }

    #[test]
    fn parse_does_not_trim() {
        assert!(" billing".parse::<Category>().is_err());
    }

    #[test]
    fn fallback_is_general_low() {
        let fallback = Classification::default();
        assert_eq!(fallback, Classification::FALLBACK);
        assert_eq!(fallback.category, Category::General);
        assert_eq!(fallback.priority, Priority::Low);
        assert!(fallback.is_fallback());
    }

    #[test]
    fn classification_serializes_lowercase() {
        let value = serde_json::to_value(Classification::new(
            Category::Account,
            Priority::Medium,
        ))
        .unwrap();
        assert_eq!(value, json!({"category": "account", "priority": "medium"}));
    }
}
