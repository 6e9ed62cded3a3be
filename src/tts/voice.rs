use serde::Serialize;
use std::fmt;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Male,
    #[default]
    Female,
}

impl VoiceGender {
    /// Read the form's `voice` field. Only `male` (any case) picks the male
    /// voice; a missing or unrecognised value falls back to female.
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(|v| v.to_lowercase()) {
            Some(v) if v == "male" => VoiceGender::Male,
            _ => VoiceGender::Female,
        }
    }

    /// Position in the engine's voice list that this gender maps to.
    ///
    /// This is a convention of the engine's enumeration order, not something
    /// the engine guarantees.
    pub fn index(self) -> usize {
        match self {
            VoiceGender::Male => 0,
            VoiceGender::Female => 1,
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceGender::Male => f.write_str("male"),
            VoiceGender::Female => f.write_str("female"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub language: String,
    pub gender: Option<VoiceGender>,
}

/// Voices enumerated from the engine once at startup, in engine order.
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    voices: Vec<VoiceInfo>,
    male_override: Option<String>,
    female_override: Option<String>,
}

impl VoiceCatalog {
    pub fn new(voices: Vec<VoiceInfo>) -> Self {
        Self {
            voices,
            male_override: None,
            female_override: None,
        }
    }

    /// Pin a gender to a specific voice id instead of its list position.
    pub fn with_override(mut self, gender: VoiceGender, voice_id: Option<String>) -> Self {
        match gender {
            VoiceGender::Male => self.male_override = voice_id,
            VoiceGender::Female => self.female_override = voice_id,
        }
        self
    }

    pub fn voices(&self) -> &[VoiceInfo] {
        &self.voices
    }

    pub fn select(&self, gender: VoiceGender) -> Result<&VoiceInfo, AppError> {
        let pinned = match gender {
            VoiceGender::Male => self.male_override.as_deref(),
            VoiceGender::Female => self.female_override.as_deref(),
        };

        if let Some(id) = pinned {
            return self
                .voices
                .iter()
                .find(|v| v.id == id)
                .ok_or_else(|| AppError::VoiceUnavailable {
                    gender,
                    reason: format!("configured voice '{}' is not installed", id),
                });
        }

        let index = gender.index();
        self.voices
            .get(index)
            .ok_or_else(|| AppError::VoiceUnavailable {
                gender,
                reason: format!(
                    "engine lists {} voice(s), need at least {}",
                    self.voices.len(),
                    index + 1
                ),
            })
    }
}
