use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use std::sync::Arc;

use super::pages::Page;
use super::{HealthResponse, SynthesisForm, VoicesResponse};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::tts::VoiceGender;

pub async fn render_form() -> Html<&'static str> {
    Html(Page::Index.html())
}

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SynthesisForm>, FormRejection>,
) -> Response {
    // A body that isn't a usable form carries no text, same as an empty one
    let form = form.map(|Form(form)| form).unwrap_or_else(|e| {
        tracing::debug!("Unreadable form body: {}", e);
        SynthesisForm::default()
    });

    match speak(&state, form).await {
        Ok(response) => response,
        Err(e) => e.into_response_with(state.debug),
    }
}

async fn speak(state: &Arc<AppState>, form: SynthesisForm) -> Result<Response, AppError> {
    // Validate input
    let text = form.text.unwrap_or_default().trim().to_string();
    if text.is_empty() {
        return Err(AppError::EmptyText);
    }
    let gender = VoiceGender::from_form(form.voice.as_deref());

    // The engine call blocks until the whole file is written
    let worker = Arc::clone(state);
    let audio = tokio::task::spawn_blocking(move || worker.tts.speak(&text, gender))
        .await
        .map_err(|e| AppError::SynthesisFailed(format!("Synthesis task failed: {}", e)))??;

    tracing::info!("Synthesized {} bytes with {} voice", audio.bytes.len(), gender);

    let disposition = format!("attachment; filename=\"{}\"", audio.suggested_filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, audio.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        audio.bytes,
    )
        .into_response())
}

pub async fn about() -> Html<&'static str> {
    render_static_page(Page::About)
}

pub async fn contact() -> Html<&'static str> {
    render_static_page(Page::Contact)
}

pub async fn qr_generator() -> Html<&'static str> {
    render_static_page(Page::QrGenerator)
}

fn render_static_page(page: Page) -> Html<&'static str> {
    Html(page.html())
}

pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.tts.catalog().voices().to_vec(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
