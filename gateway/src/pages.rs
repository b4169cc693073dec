use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{info, warn};

use crate::{views, AppState};
use dashboard_core::form::{FileUpload, FormState};
use dashboard_core::registry::{InputKind, ToolDescriptor};
use dashboard_core::render::classify;
use dashboard_core::WebhookResult;

pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    Html(views::dashboard(
        state.runner.registry().tools(),
        &state.tools_config,
    ))
}

pub async fn tool_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.runner.tool(&id) {
        Ok(tool) => Html(views::tool_page(tool, &[], None)).into_response(),
        Err(_) => not_found(),
    }
}

// Browser form submission: collect fields, run the tool, render the outcome.
// The multipart rejection is held back so an unknown id still answers 404.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let tool = match state.runner.tool(&id) {
        Ok(tool) => tool,
        Err(_) => return not_found(),
    };
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return rejection.into_response(),
    };

    let (form, notices) = match collect(tool, multipart).await {
        Ok(collected) => collected,
        Err(message) => {
            let view = classify(&WebhookResult::failed(message));
            return (
                StatusCode::BAD_REQUEST,
                Html(views::tool_page(tool, &[], Some(&view))),
            )
                .into_response();
        }
    };

    let result: WebhookResult = match state.runner.run(&id, &form.into_payload()).await {
        Ok(data) => WebhookResult::ok(data),
        Err(e) => WebhookResult::failed(e.to_string()),
    };

    let view = classify(&result);
    Html(views::tool_page(tool, &notices, Some(&view))).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
}

/// Reads the multipart body into a `FormState`. Rejected values are
/// reported back as notices and leave their field unset.
async fn collect(
    tool: &ToolDescriptor,
    mut multipart: Multipart,
) -> Result<(FormState, Vec<String>), String> {
    let mut form = FormState::new();
    let mut notices = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        let Some(input) = field.name().and_then(|name| tool.input(name)) else {
            continue;
        };

        let outcome = if input.kind == InputKind::File {
            match read_upload(field).await? {
                Some(upload) => form.attach_file(input, upload),
                None => Ok(()),
            }
        } else {
            let raw = field.text().await.map_err(|e| e.body_text())?;
            form.set(input, &raw)
        };

        if let Err(rejection) = outcome {
            warn!("Tool '{}': field '{}' rejected: {}", tool.id, input.name, rejection);
            notices.push(format!("{}: {}", input.label, rejection));
        }
    }

    info!("Collected form for '{}' ({} notices)", tool.id, notices.len());
    Ok((form, notices))
}

// An empty file part is what browsers send when no file was picked
async fn read_upload(field: Field<'_>) -> Result<Option<FileUpload>, String> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await.map_err(|e| e.body_text())?;

    if filename.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(FileUpload {
        filename,
        mime_type,
        bytes: bytes.to_vec(),
    }))
}
