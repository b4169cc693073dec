use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::AppState;
use dashboard_core::registry::ToolDescriptor;
use dashboard_core::{RunError, WebhookResult};

// Every API failure goes out as `{ "success": false, "error": "..." }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        let status = match &err {
            RunError::NotFound => StatusCode::NOT_FOUND,
            RunError::Validation(_) => StatusCode::BAD_REQUEST,
            RunError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RunError::Unexpected(msg) => {
                error!("Error running tool: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(WebhookResult::failed(self.message))).into_response()
    }
}

// --- HANDLERS ---

pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.runner.registry().tools().to_vec())
}

pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToolDescriptor>, ApiError> {
    let tool = state.runner.tool(&id)?;
    Ok(Json(tool.clone()))
}

// The body is taken raw so an unknown id answers 404 before any parsing
pub async fn run_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<WebhookResult>, ApiError> {
    let data = state.runner.run_raw(&id, &body).await?;
    Ok(Json(WebhookResult::ok(data)))
}
