use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// Transcription via an external script run as an isolated subprocess.
///
/// The script receives the audio path as its argument and the API credential
/// through `GEMINI_API_KEY` in its environment. Expected stdout is a single
/// JSON object with either a `transcription` or an `error` field; free-form
/// engines do not always emit strict structure, so unparseable output falls
/// back to the raw text rather than failing outright.
pub struct GeminiScriptEngine {
    interpreter: String,
    script_path: PathBuf,
    api_key: String,
    timeout: Duration,
}

impl GeminiScriptEngine {
    pub fn new(
        interpreter: impl Into<String>,
        script_path: PathBuf,
        api_key: String,
        timeout: Duration,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            script_path,
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl TranscriptionEngine for GeminiScriptEngine {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        let invocation = Command::new(&self.interpreter)
            .arg(&self.script_path)
            .arg(audio_path)
            .env("GEMINI_API_KEY", &self.api_key)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, invocation)
            .await
            .map_err(|_| TranscriptionError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            return Err(TranscriptionError::EngineFailed(if message.is_empty() {
                format!("engine exited with {}", output.status)
            } else {
                message.to_string()
            }));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let raw = stdout.trim();

        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(response) => {
                if let Some(error) = response.get("error").and_then(|e| e.as_str()) {
                    return Err(TranscriptionError::EngineFailed(error.to_string()));
                }
                if let Some(text) = response.get("transcription").and_then(|t| t.as_str()) {
                    tracing::info!(chars = text.len(), "Transcription completed");
                    return Ok(text.trim().to_string());
                }
                fallback_transcript(raw)
            }
            Err(_) => fallback_transcript(raw),
        }
    }
}

fn fallback_transcript(raw: &str) -> Result<String, TranscriptionError> {
    if raw.is_empty() {
        return Err(TranscriptionError::EmptyOutput);
    }
    tracing::warn!(
        chars = raw.len(),
        "Engine output was not the expected structure; using raw text as transcript"
    );
    Ok(raw.to_string())
}
