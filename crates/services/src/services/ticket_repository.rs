//! Data access for tickets.

use async_trait::async_trait;
use db::models::ticket::{NewTicket, Ticket};
use sqlx::SqlitePool;

/// Storage seam for [`TicketService`](super::ticket::TicketService).
/// Implementations are thin pass-throughs: store errors surface unchanged.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, ticket: NewTicket) -> Result<Ticket, sqlx::Error>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Ticket>, sqlx::Error>;

    /// Page of tickets in insertion order.
    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Ticket>, sqlx::Error>;

    async fn update(&self, ticket: &Ticket) -> Result<Ticket, sqlx::Error>;

    async fn delete(&self, id: i64) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct SqliteTicketRepository {
    pool: SqlitePool,
}

impl SqliteTicketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepository {
    async fn create(&self, ticket: NewTicket) -> Result<Ticket, sqlx::Error> {
        Ticket::create(&self.pool, &ticket).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Ticket>, sqlx::Error> {
        Ticket::find_by_id(&self.pool, id).await
    }

    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Ticket>, sqlx::Error> {
        Ticket::find_page(&self.pool, skip, limit).await
    }

    async fn update(&self, ticket: &Ticket) -> Result<Ticket, sqlx::Error> {
        Ticket::update(&self.pool, ticket).await
    }

    async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        Ticket::delete(&self.pool, id).await?;
        Ok(())
    }
}
