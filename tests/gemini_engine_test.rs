use std::path::PathBuf;
use std::time::Duration;

use soundpress::application::ports::{TranscriptionEngine, TranscriptionError};
use soundpress::infrastructure::transcription::GeminiScriptEngine;

fn write_script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("engine.sh");
    std::fs::write(&path, body).unwrap();
    path
}

fn engine_for(script: PathBuf, timeout: Duration) -> GeminiScriptEngine {
    GeminiScriptEngine::new("sh", script, "test-api-key".to_string(), timeout)
}

fn audio_fixture(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("audio.mp3");
    std::fs::write(&path, b"not really mp3").unwrap();
    path
}

#[tokio::test]
async fn given_structured_output_when_transcribing_then_text_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, r#"echo '{"transcription": "  hello world  "}'"#);
    let audio = audio_fixture(&dir);

    let engine = engine_for(script, Duration::from_secs(5));
    let transcript = engine.transcribe(&audio).await.unwrap();
    assert_eq!(transcript, "hello world");
}

#[tokio::test]
async fn given_error_field_when_transcribing_then_engine_failed() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, r#"echo '{"error": "quota exceeded"}'"#);
    let audio = audio_fixture(&dir);

    let engine = engine_for(script, Duration::from_secs(5));
    let result = engine.transcribe(&audio).await;
    match result {
        Err(TranscriptionError::EngineFailed(message)) => {
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected EngineFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn given_unstructured_output_when_transcribing_then_raw_text_used() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "echo 'plain words straight from the engine'");
    let audio = audio_fixture(&dir);

    let engine = engine_for(script, Duration::from_secs(5));
    let transcript = engine.transcribe(&audio).await.unwrap();
    assert_eq!(transcript, "plain words straight from the engine");
}

#[tokio::test]
async fn given_empty_output_when_transcribing_then_empty_output_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "true");
    let audio = audio_fixture(&dir);

    let engine = engine_for(script, Duration::from_secs(5));
    let result = engine.transcribe(&audio).await;
    assert!(matches!(result, Err(TranscriptionError::EmptyOutput)));
}

#[tokio::test]
async fn given_nonzero_exit_when_transcribing_then_stderr_reported() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "echo 'model crashed' >&2\nexit 3");
    let audio = audio_fixture(&dir);

    let engine = engine_for(script, Duration::from_secs(5));
    let result = engine.transcribe(&audio).await;
    match result {
        Err(TranscriptionError::EngineFailed(message)) => {
            assert!(message.contains("model crashed"));
        }
        other => panic!("expected EngineFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn given_slow_script_when_transcribing_then_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "sleep 5");
    let audio = audio_fixture(&dir);

    let engine = engine_for(script, Duration::from_millis(200));
    let result = engine.transcribe(&audio).await;
    assert!(matches!(result, Err(TranscriptionError::Timeout(_))));
}

#[tokio::test]
async fn given_engine_invocation_then_credential_and_audio_path_passed_through() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        &dir,
        r#"printf '{"transcription": "key=%s file=%s"}' "$GEMINI_API_KEY" "$1""#,
    );
    let audio = audio_fixture(&dir);

    let engine = engine_for(script, Duration::from_secs(5));
    let transcript = engine.transcribe(&audio).await.unwrap();
    assert!(transcript.contains("key=test-api-key"));
    assert!(transcript.contains(&audio.display().to_string()));
}
