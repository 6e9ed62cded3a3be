pub mod espeak;
pub mod voice;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::AppError;

pub use espeak::EspeakEngine;
pub use voice::{VoiceCatalog, VoiceGender, VoiceInfo};

pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";
pub const AUDIO_FILENAME: &str = "speech.mp3";

/// An offline synthesis backend.
pub trait SpeechEngine: Send + Sync {
    /// Every voice the engine can render with, in the engine's own order.
    fn voices(&self) -> Result<Vec<VoiceInfo>, AppError>;

    /// Render `text` into the file at `out`. Returns once the file is complete.
    fn render_to_file(&self, text: &str, voice: &VoiceInfo, out: &Path) -> Result<(), AppError>;

    /// Suffix for staging files handed to `render_to_file`.
    fn file_extension(&self) -> &str;
}

/// Synthesized audio held in memory for a single response.
#[derive(Debug)]
pub struct AudioArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub suggested_filename: &'static str,
}

pub struct TtsService {
    engine: Arc<dyn SpeechEngine>,
    catalog: VoiceCatalog,
    staging_dir: PathBuf,
}

impl TtsService {
    /// Enumerate the engine's voices once and keep them for every request.
    pub fn new(engine: Arc<dyn SpeechEngine>, config: &EngineConfig) -> Result<Self, AppError> {
        let catalog = VoiceCatalog::new(engine.voices()?)
            .with_override(VoiceGender::Male, config.male_voice.clone())
            .with_override(VoiceGender::Female, config.female_voice.clone());

        tracing::info!("Loaded {} voice(s)", catalog.voices().len());
        for gender in [VoiceGender::Male, VoiceGender::Female] {
            match catalog.select(gender) {
                Ok(voice) => tracing::info!("{} voice: {} ({})", gender, voice.id, voice.name),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        Ok(Self {
            engine,
            catalog,
            staging_dir: config.staging_dir.clone(),
        })
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Synthesize `text` with the voice chosen for `gender`.
    ///
    /// Blocks until the engine finishes. The staging file is unique to this
    /// call and is gone by the time this returns, whatever the outcome.
    pub fn speak(&self, text: &str, gender: VoiceGender) -> Result<AudioArtifact, AppError> {
        let voice = self.catalog.select(gender)?;

        let staged = tempfile::Builder::new()
            .prefix("speech-")
            .suffix(&format!(".{}", self.engine.file_extension()))
            .tempfile_in(&self.staging_dir)?;

        tracing::debug!(
            voice = %voice.id,
            chars = text.chars().count(),
            path = %staged.path().display(),
            "Synthesizing"
        );

        // On error `staged` is dropped here, which removes the file
        self.engine.render_to_file(text, voice, staged.path())?;
        let bytes = std::fs::read(staged.path())?;
        staged.close()?;

        if bytes.is_empty() {
            return Err(AppError::SynthesisFailed(
                "Engine produced no audio".to_string(),
            ));
        }

        Ok(AudioArtifact {
            bytes,
            mime_type: AUDIO_MIME_TYPE,
            suggested_filename: AUDIO_FILENAME,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Engine double that writes fixed bytes and counts render calls.
    pub struct FakeEngine {
        pub voices: Vec<VoiceInfo>,
        pub fail: bool,
        pub calls: AtomicUsize,
        pub last_voice: std::sync::Mutex<Option<String>>,
    }

    impl FakeEngine {
        pub fn with_voices(ids: &[&str]) -> Self {
            Self {
                voices: ids
                    .iter()
                    .map(|id| VoiceInfo {
                        id: id.to_string(),
                        name: id.to_string(),
                        language: "en".to_string(),
                        gender: None,
                    })
                    .collect(),
                fail: false,
                calls: AtomicUsize::new(0),
                last_voice: std::sync::Mutex::new(None),
            }
        }

        pub fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_voice(&self) -> Option<String> {
            self.last_voice.lock().unwrap().clone()
        }
    }

    impl SpeechEngine for FakeEngine {
        fn voices(&self) -> Result<Vec<VoiceInfo>, AppError> {
            Ok(self.voices.clone())
        }

        fn render_to_file(&self, text: &str, voice: &VoiceInfo, out: &Path) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_voice.lock().unwrap() = Some(voice.id.clone());
            // Write first so failure paths also leave something to clean up
            std::fs::write(out, format!("ID3 {}", text))?;
            if self.fail {
                return Err(AppError::SynthesisFailed("engine crashed".to_string()));
            }
            Ok(())
        }

        fn file_extension(&self) -> &str {
            "mp3"
        }
    }

    pub fn engine_config(staging_dir: &Path) -> EngineConfig {
        EngineConfig {
            binary: "fake".to_string(),
            language: "en".to_string(),
            rate: None,
            male_voice: None,
            female_voice: None,
            staging_dir: staging_dir.to_path_buf(),
        }
    }

    pub fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }
}
