use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::tts::VoiceGender;

pub const EMPTY_TEXT_MESSAGE: &str = "Error: No text provided";
const GENERIC_FAILURE_MESSAGE: &str = "Speech synthesis failed";

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No text provided")]
    EmptyText,

    #[error("No {gender} voice available: {reason}")]
    VoiceUnavailable { gender: VoiceGender, reason: String },

    #[error("TTS generation failed: {0}")]
    SynthesisFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::EmptyText => "EMPTY_TEXT",
            AppError::VoiceUnavailable { .. } => "VOICE_UNAVAILABLE",
            AppError::SynthesisFailed(_) => "TTS_ERROR",
            AppError::IoError(_) => "IO_ERROR",
        }
    }

    /// Build the HTTP response. Engine details are only exposed when `verbose`
    /// is set, which the server ties to debug mode.
    pub fn into_response_with(self, verbose: bool) -> Response {
        if let AppError::EmptyText = self {
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                EMPTY_TEXT_MESSAGE,
            )
                .into_response();
        }

        let code = self.code();
        tracing::error!("Request failed: {} - {}", code, self);

        let message = if verbose {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}
