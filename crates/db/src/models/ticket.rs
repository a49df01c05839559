use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use ts_rs::TS;

pub const TITLE_MAX_CHARS: usize = 200;
pub const PRIORITY_MIN: i32 = 1;
pub const PRIORITY_MAX: i32 = 5;
pub const DEFAULT_PRIORITY: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters, got {0}", max = TITLE_MAX_CHARS)]
    TitleTooLong(usize),
    #[error("description must not be empty")]
    EmptyDescription,
    #[error(
        "priority must be between {min} and {max}, got {0}",
        min = PRIORITY_MIN,
        max = PRIORITY_MAX
    )]
    PriorityOutOfRange(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, TS)]
pub struct Ticket {
    #[ts(type = "number")]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub is_completed: bool,
}

/// Request body for creating a ticket
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl CreateTicket {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn validate(&self) -> Result<(), TicketValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        if let Some(priority) = self.priority {
            validate_priority(priority)?;
        }
        Ok(())
    }
}

/// Request body for updating a ticket. Only fields that are present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateTicket {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl UpdateTicket {
    pub fn validate(&self) -> Result<(), TicketValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(priority) = self.priority {
            validate_priority(priority)?;
        }
        Ok(())
    }

    /// Partial merge onto a stored ticket. `id` is never touched.
    pub fn apply_to(self, ticket: &mut Ticket) {
        if let Some(title) = self.title {
            ticket.title = title;
        }
        if let Some(description) = self.description {
            ticket.description = description;
        }
        if let Some(is_completed) = self.is_completed {
            ticket.is_completed = is_completed;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
    }
}

/// A fully resolved row ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: i32,
}

fn validate_title(title: &str) -> Result<(), TicketValidationError> {
    let chars = title.chars().count();
    if chars == 0 {
        return Err(TicketValidationError::EmptyTitle);
    }
    if chars > TITLE_MAX_CHARS {
        return Err(TicketValidationError::TitleTooLong(chars));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), TicketValidationError> {
    if description.is_empty() {
        return Err(TicketValidationError::EmptyDescription);
    }
    Ok(())
}

fn validate_priority(priority: i32) -> Result<(), TicketValidationError> {
    if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
        return Err(TicketValidationError::PriorityOutOfRange(priority));
    }
    Ok(())
}

impl Ticket {
    pub async fn create(pool: &SqlitePool, data: &NewTicket) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            r#"INSERT INTO tickets (title, description, priority, is_completed)
               VALUES ($1, $2, $3, 0)
               RETURNING id, title, description, priority, is_completed"#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            r#"SELECT id, title, description, priority, is_completed
               FROM tickets
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Offset page in insertion order.
    pub async fn find_page(
        pool: &SqlitePool,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            r#"SELECT id, title, description, priority, is_completed
               FROM tickets
               ORDER BY id ASC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await
    }

    /// Writes every mutable column of `ticket`. Fails with `RowNotFound` when
    /// the row no longer exists.
    pub async fn update(pool: &SqlitePool, ticket: &Ticket) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            r#"UPDATE tickets
               SET title = $2, description = $3, priority = $4, is_completed = $5
               WHERE id = $1
               RETURNING id, title, description, priority, is_completed"#,
        )
        .bind(ticket.id)
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(ticket.priority)
        .bind(ticket.is_completed)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    fn new_ticket(title: &str, priority: i32) -> NewTicket {
        NewTicket {
            title: title.to_string(),
            description: "Users can't login with correct credentials".to_string(),
            priority,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_defaults() {
        let db = DBService::new_in_memory().await.unwrap();
        let first = Ticket::create(&db.pool, &new_ticket("Fix authentication bug", 3))
            .await
            .unwrap();
        let second = Ticket::create(&db.pool, &new_ticket("Update docs", 1))
            .await
            .unwrap();

        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert_eq!(first.priority, 3);
        assert!(!first.is_completed);
        assert_eq!(Ticket::find_page(&db.pool, 0, 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_missing_row() {
        let db = DBService::new_in_memory().await.unwrap();
        assert!(Ticket::find_by_id(&db.pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_page_respects_offset_and_limit() {
        let db = DBService::new_in_memory().await.unwrap();
        for title in ["Bug in payment", "Update docs", "Refactor code"] {
            Ticket::create(&db.pool, &new_ticket(title, 2)).await.unwrap();
        }

        let page = Ticket::find_page(&db.pool, 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Update docs");

        let all = Ticket::find_page(&db.pool, 0, 100).await.unwrap();
        let titles: Vec<_> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Bug in payment", "Update docs", "Refactor code"]);
    }

    #[tokio::test]
    async fn update_persists_all_mutable_fields() {
        let db = DBService::new_in_memory().await.unwrap();
        let mut ticket = Ticket::create(&db.pool, &new_ticket("Fix authentication bug", 3))
            .await
            .unwrap();
        ticket.title = "Fix SSO bug".to_string();
        ticket.is_completed = true;

        let updated = Ticket::update(&db.pool, &ticket).await.unwrap();
        assert_eq!(updated, ticket);
        let stored = Ticket::find_by_id(&db.pool, ticket.id).await.unwrap().unwrap();
        assert_eq!(stored, ticket);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_row_not_found() {
        let db = DBService::new_in_memory().await.unwrap();
        let ghost = Ticket {
            id: 42,
            title: "ghost".to_string(),
            description: "x".to_string(),
            priority: 1,
            is_completed: false,
        };
        let err = Ticket::update(&db.pool, &ghost).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let db = DBService::new_in_memory().await.unwrap();
        let ticket = Ticket::create(&db.pool, &new_ticket("Fix authentication bug", 3))
            .await
            .unwrap();

        assert_eq!(Ticket::delete(&db.pool, ticket.id).await.unwrap(), 1);
        assert!(Ticket::find_by_id(&db.pool, ticket.id).await.unwrap().is_none());
        assert_eq!(Ticket::delete(&db.pool, ticket.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn store_rejects_out_of_range_priority() {
        let db = DBService::new_in_memory().await.unwrap();
        let result = Ticket::create(&db.pool, &new_ticket("bad", 9)).await;
        assert!(result.is_err());
    }

    #[test]
    fn create_validation() {
        assert!(CreateTicket::new("routine", "x").validate().is_ok());
        assert_eq!(
            CreateTicket::new("", "x").validate(),
            Err(TicketValidationError::EmptyTitle)
        );
        assert_eq!(
            CreateTicket::new("t", "").validate(),
            Err(TicketValidationError::EmptyDescription)
        );
        assert_eq!(
            CreateTicket::new("a".repeat(201), "x").validate(),
            Err(TicketValidationError::TitleTooLong(201))
        );
        assert!(CreateTicket::new("a".repeat(200), "x").validate().is_ok());
        assert_eq!(
            CreateTicket::new("t", "x").with_priority(0).validate(),
            Err(TicketValidationError::PriorityOutOfRange(0))
        );
        assert_eq!(
            CreateTicket::new("t", "x").with_priority(6).validate(),
            Err(TicketValidationError::PriorityOutOfRange(6))
        );
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let title = "é".repeat(200);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert!(CreateTicket::new(title, "x").validate().is_ok());
    }

    #[test]
    fn update_validation_only_checks_present_fields() {
        assert!(UpdateTicket::default().validate().is_ok());
        let update = UpdateTicket {
            title: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(update.validate(), Err(TicketValidationError::EmptyTitle));
        let update = UpdateTicket {
            priority: Some(10),
            ..Default::default()
        };
        assert_eq!(
            update.validate(),
            Err(TicketValidationError::PriorityOutOfRange(10))
        );
    }

    #[test]
    fn apply_to_merges_only_present_fields() {
        let mut ticket = Ticket {
            id: 7,
            title: "Fix authentication bug".to_string(),
            description: "Users can't login".to_string(),
            priority: 3,
            is_completed: false,
        };
        let update: UpdateTicket = serde_json::from_str(r#"{"is_completed": true}"#).unwrap();
        update.apply_to(&mut ticket);

        assert_eq!(ticket.id, 7);
        assert_eq!(ticket.title, "Fix authentication bug");
        assert_eq!(ticket.description, "Users can't login");
        assert_eq!(ticket.priority, 3);
        assert!(ticket.is_completed);
    }

    #[test]
    fn create_payload_priority_is_optional() {
        let payload: CreateTicket =
            serde_json::from_str(r#"{"title": "routine", "description": "x"}"#).unwrap();
        assert_eq!(payload.priority, None);
        let payload: CreateTicket =
            serde_json::from_str(r#"{"title": "routine", "description": "x", "priority": null}"#)
                .unwrap();
        assert_eq!(payload.priority, None);
    }
}
