//! CRUD routes for tickets.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::ticket::{CreateTicket, Ticket, UpdateTicket};
use services::services::ticket::Pagination;

use crate::{AppState, error::ApiError};

/// POST /tickets/
/// Titles containing CRITICAL or URGENTE are created with priority 5.
pub async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<CreateTicket>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Ticket>), ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let ticket = state.ticket_service().create_ticket(payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ticket)))
}

/// GET /tickets/?skip=&limit=
pub async fn get_tickets(
    State(state): State<AppState>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<ResponseJson<Vec<Ticket>>, ApiError> {
    let Query(pagination) = pagination?;
    pagination.validate()?;

    let tickets = state.ticket_service().get_all_tickets(pagination).await?;
    Ok(ResponseJson(tickets))
}

/// GET /tickets/{ticket_id}
pub async fn get_ticket(
    State(state): State<AppState>,
    ticket_id: Result<Path<i64>, PathRejection>,
) -> Result<ResponseJson<Ticket>, ApiError> {
    let Path(ticket_id) = ticket_id?;
    let ticket = state.ticket_service().get_ticket(ticket_id).await?;
    Ok(ResponseJson(ticket))
}

/// PUT /tickets/{ticket_id}
/// Only the fields present in the body are changed.
pub async fn update_ticket(
    State(state): State<AppState>,
    ticket_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTicket>, JsonRejection>,
) -> Result<ResponseJson<Ticket>, ApiError> {
    let Path(ticket_id) = ticket_id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let ticket = state
        .ticket_service()
        .update_ticket(ticket_id, payload)
        .await?;
    Ok(ResponseJson(ticket))
}

/// DELETE /tickets/{ticket_id}
pub async fn delete_ticket(
    State(state): State<AppState>,
    ticket_id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(ticket_id) = ticket_id?;
    state.ticket_service().delete_ticket(ticket_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router(_state: &AppState) -> Router<AppState> {
    let collection = post(create_ticket).get(get_tickets);
    let item = get(get_ticket).put(update_ticket).delete(delete_ticket);

    Router::new()
        .route("/tickets/", collection.clone())
        .route("/tickets", collection)
        .route("/tickets/{ticket_id}", item)
}
