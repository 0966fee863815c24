use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Turn a folder of still images into an MP4 slideshow with crossfade
/// transitions. Requires `ffmpeg` on PATH.
#[derive(Parser, Debug)]
#[command(name = "slidefade", version)]
struct Cli {
    /// Folder containing the source images (.jpg/.jpeg/.png), played in
    /// filename order.
    #[arg(long, short = 'i')]
    images: PathBuf,

    /// Output MP4 path.
    #[arg(long, short = 'o', default_value = "slideshow.mp4")]
    out: PathBuf,

    /// Frame rate of the output video.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seconds each image is held on screen.
    #[arg(long, default_value_t = 3.0)]
    duration: f64,

    /// Seconds each crossfade lasts.
    #[arg(long, default_value_t = 1.0)]
    transition_duration: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = slidefade::SlideshowConfig {
        image_folder: cli.images,
        output_file: cli.out,
        fps: cli.fps,
        hold_seconds: cli.duration,
        transition_seconds: cli.transition_duration,
    };

    match slidefade::create_slideshow(&config, &mut slidefade::LogObserver) {
        Ok(stats) => {
            tracing::info!(
                images = stats.images,
                skipped = stats.skipped,
                frames = stats.frames,
                elapsed_secs = format!("{:.2}", stats.elapsed.as_secs_f64()),
                "slideshow created"
            );
            eprintln!("wrote {}", config.output_file.display());
            Ok(())
        }
        // An empty folder is an operator-level condition, not a failure.
        Err(err @ slidefade::SlideshowError::NoImages { .. }) => {
            tracing::warn!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
