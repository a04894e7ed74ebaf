use clap::Parser;
use minifb::Key;
use scan_grid::capture::{CaptureLoop, StopReason, V4l2Source, WindowSink};
use scan_grid::{CameraConfig, DecoderBackend, FramePipeline, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;

const WINDOW_TITLE: &str = "All Transformations and Decodings";

#[derive(Parser)]
#[command(name = "scan_grid", version, about = "Live barcode scanning with a multi-panel view")]
struct Cli {
    /// Capture device
    #[arg(long, default_value = "/dev/video0")]
    device: String,
    #[arg(long, default_value_t = 640)]
    width: u32,
    #[arg(long, default_value_t = 480)]
    height: u32,
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// TrueType font replacing the bundled DejaVu Sans
    #[arg(long)]
    font: Option<PathBuf>,
    /// Also decode the raw frame when the binarized frame decoded
    #[arg(long)]
    decode_original_always: bool,
    /// Decoder engine: zbar (linear and QR) or qr
    #[arg(long, default_value = "zbar")]
    decoder: DecoderBackend,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let camera = CameraConfig::default()
        .with_device(cli.device)
        .with_resolution(cli.width, cli.height)
        .with_fps(cli.fps);
    let mut config = PipelineConfig::default().with_decode_original_always(cli.decode_original_always);
    if let Some(font) = cli.font {
        config = config.with_font_path(font);
    }
    log::info!("pipeline config: {:?}, decoder: {}", config, cli.decoder);

    let pipeline = match FramePipeline::new(&config, cli.decoder.build()) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let source = match V4l2Source::new(camera) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Failed to open camera: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let sink = WindowSink::new(WINDOW_TITLE, Key::Q);
    let mut capture = CaptureLoop::new(source, sink, pipeline);

    match capture.run() {
        // A lost camera ends the session the same way the quit key does
        Ok(StopReason::Cancelled | StopReason::CaptureFailed) => ExitCode::SUCCESS,
        Ok(StopReason::DisplayFailed) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Pipeline error: {}", err);
            ExitCode::FAILURE
        }
    }
}
