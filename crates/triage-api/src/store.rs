//! In-memory ticket storage.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use triage_core::{
    Classification, NewTicket, Ticket, TicketError, TicketFilter, TicketPatch, TicketStats,
};

/// Tickets held for the lifetime of the process.
#[derive(Debug, Default)]
pub struct TicketStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tickets: Vec<Ticket>,
    last_id: u64,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new ticket created now.
    pub async fn insert(
        &self,
        input: NewTicket,
        classification: Classification,
    ) -> Result<Ticket, TicketError> {
        self.insert_at(input, classification, Utc::now()).await
    }

    /// Store a new ticket with an explicit creation time.
    pub async fn insert_at(
        &self,
        input: NewTicket,
        classification: Classification,
        created_at: DateTime<Utc>,
    ) -> Result<Ticket, TicketError> {
        let mut inner = self.inner.write().await;
        let ticket = Ticket::create(inner.last_id + 1, input, classification, created_at)?;
        inner.last_id = ticket.id;
        inner.tickets.push(ticket.clone());
        Ok(ticket)
    }

    /// Matching tickets, newest first.
    pub async fn list(&self, filter: &TicketFilter) -> Vec<Ticket> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tickets
    }

    pub async fn get(&self, id: u64) -> Option<Ticket> {
        let inner = self.inner.read().await;
        inner.tickets.iter().find(|t| t.id == id).cloned()
    }

    pub async fn update(&self, id: u64, patch: TicketPatch) -> Result<Ticket, TicketError> {
        let mut inner = self.inner.write().await;
        let ticket = inner
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TicketError::NotFound(id))?;
        ticket.apply(patch)?;
        Ok(ticket.clone())
    }

    pub async fn stats(&self) -> TicketStats {
        let inner = self.inner.read().await;
        TicketStats::from_tickets(&inner.tickets)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.tickets.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
