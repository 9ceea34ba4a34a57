use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::application::ports::{MediaSource, MediaSourceError, SourceMetadata};

/// Acquisition via `yt-dlp` piped straight into an `ffmpeg` transcode.
///
/// The audio-only track is streamed through the transcoder instead of being
/// materialized first, so temporary disk usage is bounded by the transcoded
/// output alone.
pub struct YtDlpSource {
    ytdlp_bin: String,
    ffmpeg_bin: String,
    bitrate_kbps: u32,
}

impl YtDlpSource {
    pub fn new(
        ytdlp_bin: impl Into<String>,
        ffmpeg_bin: impl Into<String>,
        bitrate_kbps: u32,
    ) -> Self {
        Self {
            ytdlp_bin: ytdlp_bin.into(),
            ffmpeg_bin: ffmpeg_bin.into(),
            bitrate_kbps,
        }
    }
}

#[async_trait]
impl MediaSource for YtDlpSource {
    async fn probe(&self, url: &str) -> Result<SourceMetadata, MediaSourceError> {
        let output = Command::new(&self.ytdlp_bin)
            .args(["--dump-single-json", "--no-playlist", "--no-warnings"])
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(MediaSourceError::Unavailable(stderr_tail(&output.stderr)));
        }

        let metadata: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| MediaSourceError::Unavailable(format!("metadata parse: {}", e)))?;

        let title = metadata
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or("audio")
            .to_string();

        tracing::debug!(title = %title, "Source metadata resolved");

        Ok(SourceMetadata { title })
    }

    async fn extract_audio(&self, url: &str, output: &Path) -> Result<(), MediaSourceError> {
        let mut downloader = Command::new(&self.ytdlp_bin)
            .args([
                "-f",
                "bestaudio",
                "--no-playlist",
                "--no-warnings",
                "--no-progress",
                "-o",
                "-",
            ])
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let audio_stream = downloader
            .stdout
            .take()
            .ok_or_else(|| MediaSourceError::NoAudioTrack("downloader produced no stream".into()))?;

        // The downloader logs to stderr while the audio goes to stdout; its
        // stderr pipe must be drained in parallel with the transcode or a
        // full pipe buffer stalls both processes mid-transfer.
        let downloader_stderr = downloader.stderr.take();
        let stderr_drain = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = downloader_stderr {
                let _ = stderr.read_to_end(&mut buf).await;
            }
            buf
        });

        let transcoder_stdin: Stdio = audio_stream.try_into()?;

        let transcode = Command::new(&self.ffmpeg_bin)
            .args(["-hide_banner", "-loglevel", "error", "-i", "pipe:0", "-vn"])
            .args(["-codec:a", "libmp3lame"])
            .arg("-b:a")
            .arg(format!("{}k", self.bitrate_kbps))
            .args(["-f", "mp3", "-y"])
            .arg(output)
            .stdin(transcoder_stdin)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        let download_status = downloader.wait().await?;
        let download_stderr = stderr_drain.await.unwrap_or_default();

        if !download_status.success() {
            return Err(MediaSourceError::Unavailable(stderr_tail(&download_stderr)));
        }
        if !transcode.status.success() {
            return Err(MediaSourceError::TranscodeFailed(stderr_tail(
                &transcode.stderr,
            )));
        }

        // A partially written file must not pass as success.
        let size = tokio::fs::metadata(output).await.map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(MediaSourceError::TranscodeFailed(
                "transcoder produced an empty file".into(),
            ));
        }

        tracing::debug!(bytes = size, output = %output.display(), "Transcode finished");

        Ok(())
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "process exited with an error".to_string();
    }
    let tail_start = trimmed.len().saturating_sub(500);
    let boundary = (tail_start..trimmed.len())
        .find(|i| trimmed.is_char_boundary(*i))
        .unwrap_or(0);
    trimmed[boundary..].to_string()
}
