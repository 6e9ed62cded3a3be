pub mod handlers;
pub mod pages;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::tts::VoiceInfo;

/// Fields posted by the input form. Both are optional on the wire; missing
/// text is treated as empty and a missing voice as female.
#[derive(Debug, Default, Deserialize)]
pub struct SynthesisForm {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
