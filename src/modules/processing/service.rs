use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use tempfile::TempDir;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use crate::config::settings::AppConfig;

const GLYPH: &str = "😀";
const FONT_SIZE: u32 = 72;
const FONT_COLOR: &str = "white";

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ffmpeg exited with {status}")]
    Ffmpeg { status: std::process::ExitStatus },
    #[error("ffmpeg reported success but produced no output file")]
    MissingOutput,
}

/// Runs the emoji overlay through an external ffmpeg process. Each job
/// gets its own temporary directory holding `input.<ext>` and
/// `output.<ext>`; the directory is reclaimed when the job's result is
/// dropped, on the failure paths immediately.
pub struct OverlayService {
    ffmpeg_bin: String,
    font: String,
}

/// A finished job: the output file plus the directory that owns it.
#[derive(Debug)]
pub struct ProcessedVideo {
    dir: TempDir,
    output: PathBuf,
}

impl ProcessedVideo {
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Stream of the output bytes. The temp directory moves into the
    /// stream and is removed once the stream is dropped, i.e. after the
    /// response body has been fully sent or the client went away.
    pub async fn into_stream(self) -> std::io::Result<VideoStream> {
        let file = File::open(&self.output).await?;
        Ok(VideoStream {
            inner: ReaderStream::new(file),
            _dir: self.dir,
        })
    }
}

pub struct VideoStream {
    inner: ReaderStream<File>,
    _dir: TempDir,
}

impl Stream for VideoStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

impl OverlayService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            ffmpeg_bin: config.ffmpeg_bin.clone(),
            font: config.drawtext_font.clone(),
        }
    }

    fn drawtext_filter(&self) -> String {
        format!(
            "drawtext=text='{GLYPH}':fontfile={}:fontsize={FONT_SIZE}:x=(w-text_w)/2:y=(h-text_h)/2:fontcolor={FONT_COLOR}",
            self.font
        )
    }

    pub async fn add_emoji(&self, input: &[u8], ext: &str) -> Result<ProcessedVideo, OverlayError> {
        let dir = tempfile::tempdir()?;
        let input_path = dir.path().join(format!("input{ext}"));
        let output_path = dir.path().join(format!("output{ext}"));

        let mut file = File::create(&input_path).await?;
        file.write_all(input).await?;
        file.flush().await?;
        drop(file);

        let output = Command::new(&self.ffmpeg_bin)
            .arg("-y")
            .arg("-i")
            .arg(&input_path)
            .arg("-vf")
            .arg(self.drawtext_filter())
            .arg("-codec:a")
            .arg("copy")
            .arg(&output_path)
            .output()
            .await?;

        if !output.status.success() {
            error!(
                "ffmpeg error: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(OverlayError::Ffmpeg {
                status: output.status,
            });
        }

        if !output_path.exists() {
            return Err(OverlayError::MissingOutput);
        }

        info!("overlay complete: {}", output_path.display());
        Ok(ProcessedVideo {
            dir,
            output: output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use std::os::unix::fs::PermissionsExt;

    fn config_with_bin(bin: &str) -> AppConfig {
        AppConfig {
            server_port: 0,
            ffmpeg_bin: bin.to_string(),
            drawtext_font: "/tmp/test-font.ttf".to_string(),
        }
    }

    // Stand-in for ffmpeg that copies input ($3) to output ($8).
    fn fake_ffmpeg() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake-ffmpeg");
        std::fs::write(&path, "#!/bin/sh\ncp \"$3\" \"$8\"\n").unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        let bin = path.to_string_lossy().into_owned();
        (dir, bin)
    }

    #[test]
    fn filter_centers_the_glyph() {
        let service = OverlayService::new(&config_with_bin("ffmpeg"));
        let filter = service.drawtext_filter();
        assert!(filter.starts_with("drawtext=text="));
        assert!(filter.contains("x=(w-text_w)/2"));
        assert!(filter.contains("y=(h-text_h)/2"));
        assert!(filter.contains("fontsize=72"));
        assert!(filter.contains("fontcolor=white"));
    }

    #[tokio::test]
    async fn nonzero_exit_maps_to_ffmpeg_error() {
        let service = OverlayService::new(&config_with_bin("false"));
        let err = service.add_emoji(b"not a video", ".mp4").await.unwrap_err();
        assert!(matches!(err, OverlayError::Ffmpeg { .. }));
    }

    #[tokio::test]
    async fn missing_output_despite_success_is_detected() {
        let service = OverlayService::new(&config_with_bin("true"));
        let err = service.add_emoji(b"not a video", ".mp4").await.unwrap_err();
        assert!(matches!(err, OverlayError::MissingOutput));
    }

    #[tokio::test]
    async fn success_streams_output_and_removes_temp_dir() {
        let (_guard, bin) = fake_ffmpeg();
        let service = OverlayService::new(&config_with_bin(&bin));

        let processed = service.add_emoji(b"fake video bytes", ".mp4").await.unwrap();
        let job_dir = processed.output_path().parent().unwrap().to_path_buf();
        assert!(job_dir.exists());

        let stream = processed.into_stream().await.unwrap();
        let collected = stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .unwrap();

        assert_eq!(collected, b"fake video bytes");
        // The stream has been consumed and dropped, so the job dir is gone.
        assert!(!job_dir.exists());
    }
}
