use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HealthInfo {
    pub name: String,
    pub version: String,
}

pub async fn health(State(state): State<AppState>) -> ResponseJson<ApiResponse<HealthInfo>> {
    let settings = state.settings();
    ResponseJson(ApiResponse::success(HealthInfo {
        name: settings.app_name.clone(),
        version: settings.version.clone(),
    }))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new().route("/health", get(health))
}
