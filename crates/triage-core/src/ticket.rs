//! Support ticket model, partial updates and list filtering.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Category, Classification, Priority, UnknownVariant, MAX_TITLE_LEN};

/// Errors raised while validating ticket input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    /// A required text field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Title exceeds [`MAX_TITLE_LEN`] characters.
    #[error("title must be at most {max} characters (got {len})")]
    TitleTooLong { len: usize, max: usize },

    /// A filter or field named a value outside the taxonomy.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    /// No ticket with this id exists.
    #[error("ticket {0} not found")]
    NotFound(u64),
}

/// Lifecycle state of a ticket.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        TicketStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == lowered)
            .ok_or_else(|| UnknownVariant::new("status", s))
    }
}

/// A stored support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Build a ticket from validated input.
    ///
    /// `classification` supplies category and priority for whichever of the
    /// two the submitter left out.
    pub fn create(
        id: u64,
        input: NewTicket,
        classification: Classification,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TicketError> {
        input.validate()?;
        Ok(Self {
            id,
            title: input.title,
            description: input.description,
            category: input.category.unwrap_or(classification.category),
            priority: input.priority.unwrap_or(classification.priority),
            status: input.status.unwrap_or_default(),
            created_at,
        })
    }

    /// Apply a partial update. Nothing is changed if validation fails.
    pub fn apply(&mut self, patch: TicketPatch) -> Result<(), TicketError> {
        patch.validate()?;
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }
}

/// Payload for creating a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

impl NewTicket {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Whether the classifier has to fill in category or priority.
    pub fn needs_classification(&self) -> bool {
        self.category.is_none() || self.priority.is_none()
    }

    pub fn validate(&self) -> Result<(), TicketError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

/// Partial update for an existing ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

impl TicketPatch {
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TicketError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), TicketError> {
    if title.trim().is_empty() {
        return Err(TicketError::MissingField("title"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(TicketError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), TicketError> {
    if description.trim().is_empty() {
        return Err(TicketError::MissingField("description"));
    }
    Ok(())
}

/// Exact-match filters plus a free-text search over title and description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
    /// Case-insensitive substring, stored lower-cased.
    pub search: Option<String>,
}

impl TicketFilter {
    /// Build a filter from raw query values. Empty values are ignored.
    pub fn parse(
        category: Option<&str>,
        priority: Option<&str>,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, TicketError> {
        fn non_empty(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        Ok(Self {
            category: non_empty(category).map(str::parse::<Category>).transpose()?,
            priority: non_empty(priority).map(str::parse::<Priority>).transpose()?,
            status: non_empty(status)
                .map(str::parse::<TicketStatus>)
                .transpose()?,
            search: non_empty(search).map(str::to_lowercase),
        })
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.category.is_some_and(|c| c != ticket.category) {
            return false;
        }
        if self.priority.is_some_and(|p| p != ticket.priority) {
            return false;
        }
        if self.status.is_some_and(|s| s != ticket.status) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                ticket.title.to_lowercase().contains(needle)
                    || ticket.description.to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(id: u64, title: &str, description: &str) -> Ticket {
        Ticket::create(
            id,
            NewTicket::new(title, description),
            Classification::FALLBACK,
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn create_fills_missing_fields_from_classification() {
        let mut input = NewTicket::new("Refund", "I was charged twice");
        input.priority = Some(Priority::High);
        let classified = Classification::new(Category::Billing, Priority::Low);

        let t = Ticket::create(7, input, classified, Utc::now()).unwrap();

        assert_eq!(t.id, 7);
        assert_eq!(t.category, Category::Billing);
        // submitter's choice wins over the classifier
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.status, TicketStatus::Open);
    }

    #[test]
    fn create_rejects_blank_title_and_long_title() {
        let blank = NewTicket::new("   ", "body");
        assert_eq!(
            Ticket::create(1, blank, Classification::FALLBACK, Utc::now()).unwrap_err(),
            TicketError::MissingField("title")
        );

        let long = NewTicket::new("x".repeat(201), "body");
        assert!(matches!(
            long.validate(),
            Err(TicketError::TitleTooLong { len: 201, max: 200 })
        ));
        assert!(NewTicket::new("x".repeat(200), "body").validate().is_ok());
    }

    #[test]
    fn apply_is_partial_and_atomic() {
        let mut t = ticket(1, "Login fails", "cannot sign in");

        t.apply(TicketPatch::status(TicketStatus::InProgress)).unwrap();
        assert_eq!(t.status, TicketStatus::InProgress);
        assert_eq!(t.title, "Login fails");

        let bad = TicketPatch {
            category: Some(Category::Account),
            description: Some(String::new()),
            ..TicketPatch::default()
        };
        assert!(t.apply(bad).is_err());
        assert_eq!(t.category, Category::General);
        assert_eq!(t.description, "cannot sign in");
    }

    #[test]
    fn status_round_trips_through_snake_case() {
        assert_eq!(
            "in_progress".parse::<TicketStatus>().unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn filter_parse_ignores_empty_and_rejects_unknown() {
        let filter = TicketFilter::parse(Some(""), Some("HIGH"), None, Some("  Printer ")).unwrap();
        assert_eq!(filter.category, None);
        assert_eq!(filter.priority, Some(Priority::High));
        assert_eq!(filter.search.as_deref(), Some("printer"));

        let err = TicketFilter::parse(Some("hardware"), None, None, None).unwrap_err();
        assert_eq!(err.to_string(), "unknown category 'hardware'");
    }

    #[test]
    fn filter_matches_search_in_title_or_description() {
        let t = ticket(1, "Printer offline", "The office printer is down");
        let by_title = TicketFilter::parse(None, None, None, Some("PRINTER")).unwrap();
        let by_body = TicketFilter::parse(None, None, None, Some("office")).unwrap();
        let miss = TicketFilter::parse(None, None, None, Some("invoice")).unwrap();

        assert!(by_title.matches(&t));
        assert!(by_body.matches(&t));
        assert!(!miss.matches(&t));
    }

    #[test]
    fn filter_combines_exact_matches() {
        let t = ticket(1, "a", "b");
        let ok = TicketFilter::parse(Some("general"), Some("low"), Some("open"), None).unwrap();
        let wrong_status = TicketFilter::parse(None, None, Some("resolved"), None).unwrap();

        assert!(ok.matches(&t));
        assert!(!wrong_status.matches(&t));
    }
}
