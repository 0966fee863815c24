#![forbid(unsafe_code)]

pub mod blend;
pub mod encode_ffmpeg;
pub mod error;
pub mod fit;
pub mod frame;
pub mod pipeline;
pub mod scan;
pub mod sequence;

pub use blend::crossfade;
pub use encode_ffmpeg::{EncodeConfig, FfmpegEncoder, default_mp4_config, is_ffmpeg_on_path};
pub use error::{SlideshowError, SlideshowResult};
pub use fit::fit_to_frame;
pub use frame::{Frame, FrameSize};
pub use pipeline::{
    LogObserver, NullObserver, ProgressObserver, SlideshowConfig, SlideshowStats, VideoSink,
    create_slideshow, write_sequence,
};
pub use scan::list_image_files;
pub use sequence::{FrameKind, FrameSequence, SequenceTiming, SequencedFrame};
