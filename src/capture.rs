use anyhow::{anyhow, bail, Context, Result};
use log::{info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

#[derive(Clone, Debug, PartialEq)]
pub struct CaptureConfig {
    pub path: PathBuf,
    /// Four-character code tagged on the MPEG-4 stream.
    pub fourcc: [u8; 4],
    pub frame_rate: u32,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: u32,
    pub record_on_start: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            path: PathBuf::from("simulation.mp4"),
            fourcc: *b"mp4v",
            frame_rate: 60,
            width: 800,
            height: 800,
            duration_seconds: 600,
            record_on_start: false,
        }
    }
}

impl CaptureConfig {
    pub fn frame_budget(&self) -> u64 {
        self.frame_rate as u64 * self.duration_seconds as u64
    }

    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Destination for captured frames, in BGR order.
pub trait FrameSink {
    fn write_frame(&mut self, bgr: &[u8]) -> Result<()>;
    /// Flushes and finalizes the output. Called at most once.
    fn close(self) -> Result<()>;
}

/// Swaps the red and blue channels of packed 24-bit pixels in place.
pub fn rgb_to_bgr(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
}

/// MPEG-4 encoder backed by an `ffmpeg` child process reading raw BGR frames
/// from its stdin. `ffmpeg` must be on `PATH`.
pub struct FfmpegWriter {
    child: Child,
    stdin: Option<ChildStdin>,
    frame_len: usize,
    path: PathBuf,
}

impl FfmpegWriter {
    pub fn open(config: &CaptureConfig) -> Result<FfmpegWriter> {
        let fourcc = std::str::from_utf8(&config.fourcc).context("Invalid fourcc")?;
        let mut child = Command::new("ffmpeg")
            .arg("-loglevel")
            .arg("error")
            .arg("-y")
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("bgr24")
            .arg("-s")
            .arg(format!("{}x{}", config.width, config.height))
            .arg("-r")
            .arg(config.frame_rate.to_string())
            .arg("-i")
            .arg("-")
            .arg("-c:v")
            .arg("mpeg4")
            .arg("-tag:v")
            .arg(fourcc)
            .arg(&config.path)
            .stdin(Stdio::piped())
            .spawn()
            .context("Failed to start ffmpeg")?;
        let stdin = child.stdin.take().ok_or_else(|| anyhow!("ffmpeg has no stdin"))?;
        info!("Opened video stream {}", config.path.display());
        Ok(FfmpegWriter {
            child,
            stdin: Some(stdin),
            frame_len: config.frame_len(),
            path: config.path.clone(),
        })
    }
}

impl FrameSink for FfmpegWriter {
    fn write_frame(&mut self, bgr: &[u8]) -> Result<()> {
        if bgr.len() != self.frame_len {
            bail!("Frame is {} bytes, expected {}", bgr.len(), self.frame_len);
        }
        let stdin = self.stdin.as_mut().ok_or_else(|| anyhow!("Video stream closed"))?;
        stdin.write_all(bgr).context("Failed to write frame to ffmpeg")
    }

    fn close(mut self) -> Result<()> {
        // Closing stdin is the end-of-stream signal.
        drop(self.stdin.take());
        let status = self.child.wait().context("Failed to wait for ffmpeg")?;
        if !status.success() {
            bail!("ffmpeg exited with {}", status);
        }
        info!("Closed video stream {}", self.path.display());
        Ok(())
    }
}

enum RecordingState<S> {
    NotRecording,
    Recording { sink: S, frames: u64 },
}

/// Appends frames to a sink until a fixed frame budget is reached, then
/// closes it.
pub struct Recorder<S: FrameSink> {
    state: RecordingState<S>,
    budget: u64,
    scratch: Vec<u8>,
}

impl<S: FrameSink> Recorder<S> {
    pub fn new(budget: u64) -> Recorder<S> {
        Recorder {
            state: RecordingState::NotRecording,
            budget,
            scratch: Vec::new(),
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording { .. })
    }

    /// Frames appended to the current recording.
    pub fn frames(&self) -> u64 {
        match self.state {
            RecordingState::Recording { frames, .. } => frames,
            RecordingState::NotRecording => 0,
        }
    }

    pub fn start(&mut self, sink: S) {
        if self.is_recording() {
            warn!("Already recording, ignoring start");
            return;
        }
        info!("Recording started, {} frame budget", self.budget);
        self.state = RecordingState::Recording { sink, frames: 0 };
    }

    /// Appends one RGB frame if recording. Returns true when this frame used
    /// up the budget and the recording was closed.
    pub fn record(&mut self, rgb: &[u8]) -> Result<bool> {
        let done = match &mut self.state {
            RecordingState::NotRecording => return Ok(false),
            RecordingState::Recording { sink, frames } => {
                self.scratch.clear();
                self.scratch.extend_from_slice(rgb);
                rgb_to_bgr(&mut self.scratch);
                sink.write_frame(&self.scratch)?;
                *frames += 1;
                *frames >= self.budget
            }
        };
        if done {
            self.finish()?;
        }
        Ok(done)
    }

    /// Closes the current recording, if any.
    pub fn finish(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, RecordingState::NotRecording) {
            RecordingState::NotRecording => Ok(()),
            RecordingState::Recording { sink, frames } => {
                info!("Recording finished after {} frames", frames);
                sink.close()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        frames: Vec<Vec<u8>>,
        closes: usize,
    }

    struct MemorySink(Rc<RefCell<Log>>);

    impl FrameSink for MemorySink {
        fn write_frame(&mut self, bgr: &[u8]) -> Result<()> {
            self.0.borrow_mut().frames.push(bgr.to_vec());
            Ok(())
        }

        fn close(self) -> Result<()> {
            self.0.borrow_mut().closes += 1;
            Ok(())
        }
    }

    fn sink() -> (MemorySink, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (MemorySink(log.clone()), log)
    }

    #[test]
    fn swaps_red_and_blue() {
        let mut pixels = vec![1, 2, 3, 10, 20, 30];
        rgb_to_bgr(&mut pixels);
        assert_eq!(pixels, vec![3, 2, 1, 30, 20, 10]);
    }

    #[test]
    fn default_budget_is_ten_minutes() {
        let config = CaptureConfig::default();
        assert_eq!(config.frame_budget(), 60 * 600);
        assert_eq!(config.frame_len(), 800 * 800 * 3);
        assert_eq!(&config.fourcc, b"mp4v");
        assert!(!config.record_on_start);
    }

    #[test]
    fn idle_recorder_drops_frames() {
        let mut recorder = Recorder::<MemorySink>::new(3);
        assert!(!recorder.is_recording());
        assert!(!recorder.record(&[1, 2, 3]).unwrap());
        recorder.finish().unwrap();
    }

    #[test]
    fn closes_once_at_budget() {
        let (sink, log) = sink();
        let mut recorder = Recorder::new(3);
        recorder.start(sink);
        assert!(recorder.is_recording());

        assert!(!recorder.record(&[1, 2, 3]).unwrap());
        assert!(!recorder.record(&[4, 5, 6]).unwrap());
        assert_eq!(recorder.frames(), 2);
        assert!(recorder.record(&[7, 8, 9]).unwrap());
        assert!(!recorder.is_recording());

        assert!(!recorder.record(&[0, 0, 0]).unwrap());
        recorder.finish().unwrap();

        let log = log.borrow();
        assert_eq!(log.frames, vec![vec![3, 2, 1], vec![6, 5, 4], vec![9, 8, 7]]);
        assert_eq!(log.closes, 1);
    }

    #[test]
    fn finish_closes_a_partial_recording() {
        let (sink, log) = sink();
        let mut recorder = Recorder::new(100);
        recorder.start(sink);
        recorder.record(&[1, 2, 3]).unwrap();
        recorder.finish().unwrap();
        recorder.finish().unwrap();
        assert_eq!(log.borrow().closes, 1);
        assert_eq!(log.borrow().frames.len(), 1);
    }

    #[test]
    fn second_start_is_ignored() {
        let (first, first_log) = sink();
        let (second, second_log) = sink();
        let mut recorder = Recorder::new(10);
        recorder.start(first);
        recorder.start(second);
        recorder.record(&[1, 2, 3]).unwrap();
        recorder.finish().unwrap();
        assert_eq!(first_log.borrow().frames.len(), 1);
        assert_eq!(first_log.borrow().closes, 1);
        assert!(second_log.borrow().frames.is_empty());
    }
}
