use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use image::RgbImage;

use crate::{
    encode_ffmpeg::{FfmpegEncoder, default_mp4_config},
    error::{SlideshowError, SlideshowResult},
    fit::fit_to_frame,
    frame::{Frame, FrameSize},
    scan::list_image_files,
    sequence::{FrameKind, FrameSequence, SequenceTiming},
};

/// Configuration for one slideshow run.
#[derive(Clone, Debug)]
pub struct SlideshowConfig {
    pub image_folder: PathBuf,
    pub output_file: PathBuf,
    /// Frame rate of both the timing math and the output container.
    pub fps: u32,
    /// How long each image is displayed, in seconds.
    pub hold_seconds: f64,
    /// Crossfade length between consecutive images, in seconds.
    pub transition_seconds: f64,
}

impl SlideshowConfig {
    pub fn new(image_folder: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            image_folder: image_folder.into(),
            output_file: output_file.into(),
            fps: 30,
            hold_seconds: 3.0,
            transition_seconds: 1.0,
        }
    }

    pub fn timing(&self) -> SequenceTiming {
        SequenceTiming {
            fps: self.fps,
            hold_seconds: self.hold_seconds,
            transition_seconds: self.transition_seconds,
        }
    }

    pub fn validate(&self) -> SlideshowResult<()> {
        self.timing().validate()
    }
}

/// The video sink contract: accepts frames of one fixed size, in order, and
/// is finalized exactly once. [`FfmpegEncoder`] is the production impl.
pub trait VideoSink {
    fn write_frame(&mut self, frame: &Frame) -> SlideshowResult<()>;
    fn finish(&mut self) -> SlideshowResult<()>;
}

impl VideoSink for FfmpegEncoder {
    fn write_frame(&mut self, frame: &Frame) -> SlideshowResult<()> {
        FfmpegEncoder::write_frame(self, frame)
    }

    fn finish(&mut self) -> SlideshowResult<()> {
        FfmpegEncoder::finish(self)
    }
}

/// Progress callbacks, decoupled from pipeline control flow so the core stays
/// testable without console side effects.
pub trait ProgressObserver {
    fn image_processed(&mut self, _name: &str) {}
    fn image_skipped(&mut self, _name: &str, _reason: &str) {}
    fn transition_completed(&mut self, _index: usize) {}
}

pub struct NullObserver;

impl ProgressObserver for NullObserver {}

/// Observer that routes progress through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn image_processed(&mut self, name: &str) {
        tracing::info!(image = name, "processed image");
    }

    fn image_skipped(&mut self, name: &str, reason: &str) {
        tracing::warn!(image = name, reason, "could not read image, skipping");
    }

    fn transition_completed(&mut self, index: usize) {
        tracing::debug!(index, "completed transition");
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlideshowStats {
    /// Images that decoded successfully and entered the timeline.
    pub images: usize,
    /// Images skipped because they could not be decoded.
    pub skipped: usize,
    /// Output frames written to the sink.
    pub frames: u64,
    pub elapsed: Duration,
}

/// Drive a fitted timeline into `sink`, frame by frame, reporting each
/// completed transition to `observer`. Returns the number of frames written.
pub fn write_sequence(
    timeline: &[Frame],
    timing: SequenceTiming,
    sink: &mut dyn VideoSink,
    observer: &mut dyn ProgressObserver,
) -> SlideshowResult<u64> {
    let mut written = 0u64;
    let mut owner = 0usize;
    for item in FrameSequence::new(timeline, timing)? {
        let current = match item.kind {
            FrameKind::Hold { image } => image,
            FrameKind::Blend { from, .. } => from,
        };
        while owner < current {
            observer.transition_completed(owner);
            owner += 1;
        }
        sink.write_frame(item.frame.as_ref())?;
        written += 1;
    }
    // With a zero hold duration the final image emits no frames of its own,
    // so trailing transitions are reported at exhaustion.
    while owner + 1 < timeline.len() {
        observer.transition_completed(owner);
        owner += 1;
    }
    Ok(written)
}

/// Run the full pipeline: list, decode, fit, sequence, encode.
///
/// The frame size is fixed by the first successfully decoded image and the
/// encoder is only opened once at least one image has decoded, so an empty or
/// unusable folder never creates an output file.
#[tracing::instrument(skip_all, fields(
    folder = %config.image_folder.display(),
    out = %config.output_file.display(),
))]
pub fn create_slideshow(
    config: &SlideshowConfig,
    observer: &mut dyn ProgressObserver,
) -> SlideshowResult<SlideshowStats> {
    let started = Instant::now();
    config.validate()?;

    let files = list_image_files(&config.image_folder)?;
    if files.is_empty() {
        return Err(SlideshowError::no_images(&config.image_folder));
    }

    let decoded = decode_and_fit(&files, observer);
    let Some(size) = decoded.size else {
        return Err(SlideshowError::no_images(&config.image_folder));
    };
    tracing::info!(%size, images = decoded.frames.len(), skipped = decoded.skipped, "timeline ready");

    let mut encoder = FfmpegEncoder::new(default_mp4_config(&config.output_file, size, config.fps))?;
    let frames = write_sequence(&decoded.frames, config.timing(), &mut encoder, observer)?;
    encoder.finish()?;

    Ok(SlideshowStats {
        images: decoded.frames.len(),
        skipped: decoded.skipped,
        frames,
        elapsed: started.elapsed(),
    })
}

struct DecodedTimeline {
    frames: Vec<Frame>,
    size: Option<FrameSize>,
    skipped: usize,
}

fn decode_and_fit(files: &[PathBuf], observer: &mut dyn ProgressObserver) -> DecodedTimeline {
    let mut out = DecodedTimeline {
        frames: Vec::with_capacity(files.len()),
        size: None,
        skipped: 0,
    };

    for path in files {
        let name = file_name(path);
        match image::open(path) {
            Ok(img) => {
                let rgb = img.to_rgb8();
                let size = *out.size.get_or_insert_with(|| derive_frame_size(&rgb));
                out.frames.push(fit_to_frame(&rgb, size));
                observer.image_processed(name);
            }
            Err(e) => {
                out.skipped += 1;
                observer.image_skipped(name, &e.to_string());
            }
        }
    }

    out
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

// libx264/yuv420p rejects odd dimensions, so the canvas derived from the
// first image floors each axis to even.
fn derive_frame_size(first: &RgbImage) -> FrameSize {
    let (w, h) = first.dimensions();
    FrameSize::new(w & !1, h & !1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemorySink {
        frames: Vec<Frame>,
        finished: bool,
    }

    impl VideoSink for MemorySink {
        fn write_frame(&mut self, frame: &Frame) -> SlideshowResult<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn finish(&mut self) -> SlideshowResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Processed(String),
        Skipped(String),
        Transition(usize),
    }

    #[derive(Default)]
    struct RecordingObserver(Vec<Event>);

    impl ProgressObserver for RecordingObserver {
        fn image_processed(&mut self, name: &str) {
            self.0.push(Event::Processed(name.to_string()));
        }

        fn image_skipped(&mut self, name: &str, _reason: &str) {
            self.0.push(Event::Skipped(name.to_string()));
        }

        fn transition_completed(&mut self, index: usize) {
            self.0.push(Event::Transition(index));
        }
    }

    fn timeline(n: usize) -> Vec<Frame> {
        (0..n)
            .map(|i| Frame::solid(FrameSize::new(4, 4), [i as u8 * 40, 0, 0]))
            .collect()
    }

    #[test]
    fn config_defaults_match_documented_values() {
        let cfg = SlideshowConfig::new("pics", "out.mp4");
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.hold_seconds, 3.0);
        assert_eq!(cfg.transition_seconds, 1.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn write_sequence_writes_every_frame_in_order() {
        let frames = timeline(3);
        let timing = SequenceTiming {
            fps: 2,
            hold_seconds: 1.0,
            transition_seconds: 1.0,
        };
        let mut sink = MemorySink::default();
        let mut obs = RecordingObserver::default();
        let written = write_sequence(&frames, timing, &mut sink, &mut obs).unwrap();
        assert_eq!(written, 10);
        assert_eq!(sink.frames.len(), 10);
        assert_eq!(sink.frames[0], frames[0]);
        assert_eq!(*sink.frames.last().unwrap(), frames[2]);
        assert_eq!(obs.0, vec![Event::Transition(0), Event::Transition(1)]);
    }

    #[test]
    fn write_sequence_reports_trailing_transition_with_zero_hold() {
        let frames = timeline(2);
        let timing = SequenceTiming {
            fps: 2,
            hold_seconds: 0.0,
            transition_seconds: 1.0,
        };
        let mut sink = MemorySink::default();
        let mut obs = RecordingObserver::default();
        let written = write_sequence(&frames, timing, &mut sink, &mut obs).unwrap();
        assert_eq!(written, 2);
        assert_eq!(obs.0, vec![Event::Transition(0)]);
    }

    #[test]
    fn derive_frame_size_floors_to_even() {
        let img = RgbImage::new(11, 8);
        assert_eq!(derive_frame_size(&img), FrameSize::new(10, 8));
    }

    #[test]
    fn empty_folder_aborts_before_creating_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.mp4");
        let cfg = SlideshowConfig::new(dir.path(), &out);
        let err = create_slideshow(&cfg, &mut NullObserver).unwrap_err();
        assert!(matches!(err, SlideshowError::NoImages { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn undecodable_files_are_skipped_with_events() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.png");
        image::RgbImage::from_pixel(6, 4, image::Rgb([1, 2, 3]))
            .save(&good)
            .unwrap();
        std::fs::write(dir.path().join("b.png"), b"not a png").unwrap();

        let files = list_image_files(dir.path()).unwrap();
        let mut obs = RecordingObserver::default();
        let decoded = decode_and_fit(&files, &mut obs);

        assert_eq!(decoded.frames.len(), 1);
        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.size, Some(FrameSize::new(6, 4)));
        assert_eq!(
            obs.0,
            vec![
                Event::Processed("a.png".to_string()),
                Event::Skipped("b.png".to_string()),
            ]
        );
    }

    #[test]
    fn frame_size_comes_from_first_successful_decode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"junk").unwrap();
        image::RgbImage::from_pixel(8, 6, image::Rgb([0, 0, 0]))
            .save(dir.path().join("b.png"))
            .unwrap();
        image::RgbImage::from_pixel(20, 20, image::Rgb([0, 0, 0]))
            .save(dir.path().join("c.png"))
            .unwrap();

        let files = list_image_files(dir.path()).unwrap();
        let decoded = decode_and_fit(&files, &mut NullObserver);
        assert_eq!(decoded.size, Some(FrameSize::new(8, 6)));
        assert!(decoded.frames.iter().all(|f| f.size() == FrameSize::new(8, 6)));
    }
}
