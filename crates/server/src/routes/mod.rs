use axum::Router;

use crate::AppState;

pub mod health;
pub mod tickets;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router(state))
        .merge(tickets::router(state))
}
