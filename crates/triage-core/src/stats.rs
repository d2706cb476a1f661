//! Aggregate ticket statistics.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Category, Priority, Ticket, TicketStatus};

/// Counts and breakdowns over a set of tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketStats {
    pub total_tickets: usize,
    pub open_tickets: usize,
    /// Mean tickets per UTC calendar day, over days with at least one ticket.
    pub avg_tickets_per_day: f64,
    /// Every priority is present, zero-filled.
    pub priority_breakdown: BTreeMap<Priority, usize>,
    /// Every category is present, zero-filled.
    pub category_breakdown: BTreeMap<Category, usize>,
}

impl TicketStats {
    pub fn from_tickets<'a, I>(tickets: I) -> Self
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let mut priority_breakdown: BTreeMap<Priority, usize> =
            Priority::ALL.into_iter().map(|p| (p, 0)).collect();
        let mut category_breakdown: BTreeMap<Category, usize> =
            Category::ALL.into_iter().map(|c| (c, 0)).collect();
        let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
        let mut total_tickets = 0;
        let mut open_tickets = 0;

        for ticket in tickets {
            total_tickets += 1;
            if ticket.status == TicketStatus::Open {
                open_tickets += 1;
            }
            *priority_breakdown.entry(ticket.priority).or_default() += 1;
            *category_breakdown.entry(ticket.category).or_default() += 1;
            *per_day.entry(ticket.created_at.date_naive()).or_default() += 1;
        }

        let avg_tickets_per_day = if per_day.is_empty() {
            0.0
        } else {
            round_one_decimal(total_tickets as f64 / per_day.len() as f64)
        };

        Self {
            total_tickets,
            open_tickets,
            avg_tickets_per_day,
            priority_breakdown,
            category_breakdown,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
