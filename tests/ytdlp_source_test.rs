use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use soundpress::application::ports::{MediaSource, MediaSourceError};
use soundpress::infrastructure::media::YtDlpSource;

// Emits well over the pipe buffer's worth of log noise on stderr before the
// audio payload appears on stdout, like a real downloader streaming a long
// video.
const CHATTY_DOWNLOADER: &str = r#"#!/bin/sh
i=0
while [ $i -lt 2048 ]; do
  echo "[download] fragment $i of a long stream with plenty of log text padding out the line" >&2
  i=$((i+1))
done
printf 'streamed audio payload'
"#;

const FAILING_DOWNLOADER: &str = r#"#!/bin/sh
i=0
while [ $i -lt 2048 ]; do
  echo "resolver noise line $i" >&2
  i=$((i+1))
done
echo "ERROR: unable to download video data" >&2
exit 1
"#;

// Stands in for the transcoder: copies stdin to the output path (last arg).
const COPYING_TRANSCODER: &str = r#"#!/bin/sh
for arg; do last="$arg"; done
cat > "$last"
"#;

fn write_executable(dir: &tempfile::TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.display().to_string()
}

#[tokio::test]
async fn given_chatty_downloader_stderr_when_extracting_then_transfer_still_completes() {
    let dir = tempfile::tempdir().unwrap();
    let ytdlp = write_executable(&dir, "ytdlp-stub", CHATTY_DOWNLOADER);
    let ffmpeg = write_executable(&dir, "ffmpeg-stub", COPYING_TRANSCODER);
    let source = YtDlpSource::new(ytdlp, ffmpeg, 128);

    let output: PathBuf = dir.path().join("out.mp3");
    tokio::time::timeout(
        Duration::from_secs(5),
        source.extract_audio("https://example.com/watch?v=abc", &output),
    )
    .await
    .expect("extraction stalled on undrained downloader stderr")
    .unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(bytes, b"streamed audio payload");
}

#[tokio::test]
async fn given_failing_downloader_when_extracting_then_stderr_tail_in_error() {
    let dir = tempfile::tempdir().unwrap();
    let ytdlp = write_executable(&dir, "ytdlp-stub", FAILING_DOWNLOADER);
    let ffmpeg = write_executable(&dir, "ffmpeg-stub", COPYING_TRANSCODER);
    let source = YtDlpSource::new(ytdlp, ffmpeg, 128);

    let output: PathBuf = dir.path().join("out.mp3");
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        source.extract_audio("https://example.com/watch?v=abc", &output),
    )
    .await
    .expect("extraction stalled on undrained downloader stderr");

    match result {
        Err(MediaSourceError::Unavailable(message)) => {
            assert!(message.contains("unable to download video data"));
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
}
