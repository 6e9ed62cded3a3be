use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::tts::voice::{VoiceGender, VoiceInfo};
use crate::tts::SpeechEngine;

/// Offline synthesis through the `espeak-ng` command line tool.
pub struct EspeakEngine {
    binary: String,
    language: String,
    rate: Option<u32>,
}

impl EspeakEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            language: config.language.clone(),
            rate: config.rate,
        }
    }
}

impl SpeechEngine for EspeakEngine {
    fn voices(&self) -> Result<Vec<VoiceInfo>, AppError> {
        let output = Command::new(&self.binary)
            .arg(format!("--voices={}", self.language))
            .output()
            .map_err(|e| {
                AppError::SynthesisFailed(format!(
                    "Failed to run {} (is it installed?): {}",
                    self.binary, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::SynthesisFailed(format!(
                "{} --voices failed: {}",
                self.binary, stderr
            )));
        }

        Ok(parse_voices(&String::from_utf8_lossy(&output.stdout)))
    }

    fn render_to_file(&self, text: &str, voice: &VoiceInfo, out: &Path) -> Result<(), AppError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-v").arg(&voice.id).arg("-w").arg(out);
        if let Some(rate) = self.rate {
            cmd.arg("-s").arg(rate.to_string());
        }

        // Text goes through stdin so input starting with '-' is never read as a flag
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AppError::SynthesisFailed(format!(
                    "Failed to run {} (is it installed?): {}",
                    self.binary, e
                ))
            })?;

        // Always reap the child; when it exits early the write fails with a
        // broken pipe and stderr holds the real reason
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output().map_err(|e| {
            AppError::SynthesisFailed(format!("Failed to wait for {}: {}", self.binary, e))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::SynthesisFailed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        if let Err(e) = written {
            return Err(AppError::SynthesisFailed(format!(
                "Failed to send text to {}: {}",
                self.binary, e
            )));
        }

        Ok(())
    }

    /// espeak-ng only writes RIFF/WAV; the bytes are served as-is.
    fn file_extension(&self) -> &str {
        "wav"
    }
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-gb           --/M      English_(Great_Britain) gmw/en
/// ```
///
/// Column widths differ between versions, so lines are split on whitespace.
pub fn parse_voices(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let voice = parse_voice_line(line);
            if voice.is_none() && !line.trim_start().starts_with("Pty") {
                tracing::debug!(line = line, "Skipping unparseable voice line");
            }
            voice
        })
        .collect()
}

fn parse_voice_line(line: &str) -> Option<VoiceInfo> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 || parts[0].parse::<u32>().is_err() {
        return None;
    }

    let language = parts[1];
    let gender = match parts[2].rsplit('/').next() {
        Some("M") => Some(VoiceGender::Male),
        Some("F") => Some(VoiceGender::Female),
        _ => None,
    };

    Some(VoiceInfo {
        id: language.to_string(),
        name: parts[3].replace('_', " "),
        language: language.to_string(),
        gender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 2  en-gb           --/M      English_(Great_Britain) gmw/en               (en 2)
 5  en-us           --/F      English_(America)  gmw/en-US            (en 3)
 5  en-029          --/-      English_(Caribbean) gmw/en-029

garbage line
";

    #[test]
    fn parses_voice_table() {
        let voices = parse_voices(VOICES);
        assert_eq!(voices.len(), 3);

        assert_eq!(voices[0].id, "en-gb");
        assert_eq!(voices[0].name, "English (Great Britain)");
        assert_eq!(voices[0].gender, Some(VoiceGender::Male));

        assert_eq!(voices[1].id, "en-us");
        assert_eq!(voices[1].gender, Some(VoiceGender::Female));

        assert_eq!(voices[2].gender, None);
    }

    #[test]
    fn empty_output_has_no_voices() {
        assert!(parse_voices("").is_empty());
        assert!(parse_voices("Pty Language Age/Gender VoiceName File\n").is_empty());
    }

    #[test]
    fn missing_binary_is_a_synthesis_error() {
        let engine = EspeakEngine {
            binary: "definitely-not-a-real-tts-binary".to_string(),
            language: "en".to_string(),
            rate: None,
        };
        assert!(matches!(engine.voices(), Err(AppError::SynthesisFailed(_))));

        let dir = tempfile::tempdir().unwrap();
        let voice = VoiceInfo {
            id: "en".to_string(),
            name: "English".to_string(),
            language: "en".to_string(),
            gender: None,
        };
        let result = engine.render_to_file("hello", &voice, &dir.path().join("out.wav"));
        assert!(matches!(result, Err(AppError::SynthesisFailed(_))));
    }

    #[cfg(unix)]
    #[test]
    fn engine_exiting_early_is_a_synthesis_error() {
        // `false` exits without reading stdin, so a large write hits a closed pipe
        let engine = EspeakEngine {
            binary: "false".to_string(),
            language: "en".to_string(),
            rate: None,
        };
        let voice = VoiceInfo {
            id: "en".to_string(),
            name: "English".to_string(),
            language: "en".to_string(),
            gender: None,
        };
        let dir = tempfile::tempdir().unwrap();
        let text = "word ".repeat(200_000);

        let result = engine.render_to_file(&text, &voice, &dir.path().join("out.wav"));
        match result {
            Err(AppError::SynthesisFailed(msg)) => assert!(msg.contains("false")),
            other => panic!("expected SynthesisFailed, got {:?}", other),
        }
    }
}
