use std::sync::Arc;

use axum::Router;
use db::DBService;
use services::services::{config::Settings, ticket::TicketService};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: DBService, settings: Arc<Settings>) -> Self {
        Self { db, settings }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Service bound to the shared pool. Connections are checked out per
    /// query and returned when the query finishes, whatever its outcome.
    pub fn ticket_service(&self) -> TicketService {
        TicketService::from_pool(self.db.pool.clone())
    }
}

pub fn app(state: AppState) -> Router {
    routes::router(&state)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
