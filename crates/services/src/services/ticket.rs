//! Business rules for tickets.

use std::sync::Arc;

use db::models::ticket::{
    CreateTicket, DEFAULT_PRIORITY, NewTicket, PRIORITY_MAX, Ticket, UpdateTicket,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use super::ticket_repository::{SqliteTicketRepository, TicketRepository};

/// Title keywords (matched case-insensitively) that force maximum priority on creation.
pub const ESCALATION_KEYWORDS: &[&str] = &["CRITICAL", "URGENTE"];

pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum TicketServiceError {
    #[error("Ticket with id {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("skip must be greater than or equal to 0, got {0}")]
    NegativeSkip(i64),
    #[error("limit must be between 1 and {max}, got {0}", max = MAX_PAGE_LIMIT)]
    LimitOutOfRange(i64),
}

/// Offset pagination; missing query parameters take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }

    pub fn validate(&self) -> Result<(), PaginationError> {
        if self.skip < 0 {
            return Err(PaginationError::NegativeSkip(self.skip));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&self.limit) {
            return Err(PaginationError::LimitOutOfRange(self.limit));
        }
        Ok(())
    }
}

/// True when `title` contains one of [`ESCALATION_KEYWORDS`], ignoring case.
pub fn is_escalation_title(title: &str) -> bool {
    let upper = title.to_uppercase();
    ESCALATION_KEYWORDS
        .iter()
        .any(|keyword| upper.contains(keyword))
}

#[derive(Clone)]
pub struct TicketService {
    repo: Arc<dyn TicketRepository>,
}

impl TicketService {
    pub fn new(repo: Arc<dyn TicketRepository>) -> Self {
        Self { repo }
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(Arc::new(SqliteTicketRepository::new(pool)))
    }

    /// Escalation is decided here and only here; updates keep whatever
    /// priority they are given.
    pub async fn create_ticket(&self, data: CreateTicket) -> Result<Ticket, TicketServiceError> {
        let requested = data.priority.unwrap_or(DEFAULT_PRIORITY);
        let priority = if is_escalation_title(&data.title) {
            PRIORITY_MAX
        } else {
            requested
        };

        let ticket = self
            .repo
            .create(NewTicket {
                title: data.title,
                description: data.description,
                priority,
            })
            .await?;

        if priority != requested {
            info!(
                ticket_id = ticket.id,
                requested_priority = requested,
                priority,
                "Ticket escalated to maximum priority"
            );
        } else {
            debug!(ticket_id = ticket.id, priority, "Ticket created");
        }
        Ok(ticket)
    }

    pub async fn get_ticket(&self, id: i64) -> Result<Ticket, TicketServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(TicketServiceError::NotFound(id))
    }

    pub async fn get_all_tickets(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<Ticket>, TicketServiceError> {
        Ok(self
            .repo
            .get_all(pagination.skip, pagination.limit)
            .await?)
    }

    pub async fn update_ticket(
        &self,
        id: i64,
        data: UpdateTicket,
    ) -> Result<Ticket, TicketServiceError> {
        let mut ticket = self.get_ticket(id).await?;
        data.apply_to(&mut ticket);
        // The row can vanish between the read and the write.
        match self.repo.update(&ticket).await {
            Ok(updated) => Ok(updated),
            Err(sqlx::Error::RowNotFound) => Err(TicketServiceError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_ticket(&self, id: i64) -> Result<(), TicketServiceError> {
        let ticket = self.get_ticket(id).await?;
        self.repo.delete(ticket.id).await?;
        info!(ticket_id = id, "Ticket deleted");
        Ok(())
    }
}
