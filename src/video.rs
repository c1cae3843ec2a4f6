use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

/// Decodes a video file to raw RGBA frames through an `ffmpeg` child
/// process. Frames come out letterboxed to a fixed size and resampled to
/// the viewer's frame rate, so one read per rendered frame plays in real
/// time.
pub struct VideoStream {
    process: Child,
    stdout: Option<ChildStdout>,
    frame: Vec<u8>,
    frames_read: u64,
}

impl VideoStream {
    pub fn open(path: &Path, width: i32, height: i32, fps: u32) -> Result<VideoStream> {
        if !path.is_file() {
            bail!("video file not found: {}", path.display());
        }

        let filter = format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
            w = width,
            h = height
        );
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .args(["-loglevel", "error"])
            .arg("-i")
            .arg(path)
            .arg("-an")
            .args(["-vf", &filter])
            .args(["-r", &format!("{}", fps)])
            .args(["-f", "rawvideo"])
            .args(["-pix_fmt", "rgba"])
            .arg("-")
            .spawn()
            .context("Failed to start ffmpeg process")?;
        let stdout = process.stdout.take().context("Failed to open ffmpeg stdout")?;

        debug!(path = %path.display(), width, height, fps, "video decoder started");
        Ok(VideoStream {
            process,
            stdout: Some(stdout),
            frame: vec![0; (width * height * 4) as usize], // 4 bytes per pixel (RGBA)
            frames_read: 0,
        })
    }

    /// Next decoded frame, `None` once the video has played to its end.
    /// A decoder that dies before producing a single frame is an error.
    pub fn next_frame(&mut self) -> Result<Option<&[u8]>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        match stdout.read_exact(&mut self.frame) {
            Ok(()) => {
                self.frames_read += 1;
                Ok(Some(&self.frame))
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.stdout = None;
                let status = self.process.wait().context("Failed to wait for ffmpeg process")?;
                if self.frames_read == 0 && !status.success() {
                    bail!("ffmpeg exited with {} before the first frame", status);
                }
                debug!(frames = self.frames_read, "video finished");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to read from ffmpeg stdout"),
        }
    }
}

impl Drop for VideoStream {
    fn drop(&mut self) {
        // Close the pipe first so ffmpeg cannot block on a full buffer
        self.stdout = None;
        if let Ok(None) = self.process.try_wait() {
            if let Err(e) = self.process.kill() {
                warn!(error = %e, "failed to stop ffmpeg process");
            }
        }
        if let Err(e) = self.process.wait() {
            warn!(error = %e, "failed to wait for ffmpeg process");
        }
    }
}
