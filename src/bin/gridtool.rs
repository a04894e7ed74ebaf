use clap::{Parser, Subcommand};
use scan_grid::capture::{CaptureLoop, PngSink, StillImageSource};
use scan_grid::tools::{binary_stats, grayscale_stats, load_rgb, otsu_stats};
use scan_grid::{DecoderBackend, FramePipeline, PipelineConfig, Preprocessor, SymbolDecoder};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gridtool", version, about = "scan_grid offline tools")]
struct Cli {
    /// Shrink images whose longer side exceeds this many pixels
    #[arg(long, global = true)]
    max_dim: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one tick over a still image and write the grid as PNG
    Compose {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// TrueType font replacing the bundled DejaVu Sans
        #[arg(long)]
        font: Option<PathBuf>,
        #[arg(long)]
        decode_original_always: bool,
        /// Decoder engine: zbar or qr
        #[arg(long, default_value = "zbar")]
        decoder: DecoderBackend,
    },
    /// Print symbols decoded from the binarized and raw views
    Decode {
        #[arg(long)]
        image: PathBuf,
        /// Decoder engine: zbar or qr
        #[arg(long, default_value = "zbar")]
        decoder: DecoderBackend,
    },
    /// Print grayscale and binarized statistics
    Stats {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Compose {
            image,
            out,
            font,
            decode_original_always,
            decoder,
        } => compose_cmd(&image, out, font, decode_original_always, decoder, cli.max_dim),
        Command::Decode { image, decoder } => decode_cmd(&image, decoder, cli.max_dim),
        Command::Stats { image } => stats_cmd(&image, cli.max_dim),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn compose_cmd(
    image: &Path,
    out: PathBuf,
    font: Option<PathBuf>,
    decode_original_always: bool,
    decoder: DecoderBackend,
    max_dim: Option<u32>,
) -> Result<(), String> {
    let frame = load_rgb(image, max_dim)
        .map_err(|e| format!("Failed to load image {}: {}", image.display(), e))?;

    let mut config = PipelineConfig::default().with_decode_original_always(decode_original_always);
    if let Some(font) = font {
        config = config.with_font_path(font);
    }
    let pipeline = FramePipeline::new(&config, decoder.build()).map_err(|e| e.to_string())?;

    let start = Instant::now();
    let mut capture = CaptureLoop::new(
        StillImageSource::from_frames([frame]),
        PngSink::file(&out),
        pipeline,
    );
    capture.tick().map_err(|e| e.to_string())?;
    if capture.ticks() == 0 {
        return Err(format!("Failed to write grid to {}", out.display()));
    }
    println!("Wrote {} in {:?}", out.display(), start.elapsed());
    Ok(())
}

fn decode_cmd(image: &Path, backend: DecoderBackend, max_dim: Option<u32>) -> Result<(), String> {
    let frame = load_rgb(image, max_dim)
        .map_err(|e| format!("Failed to load image {}: {}", image.display(), e))?;
    println!("Image: {} ({}x{})", image.display(), frame.width(), frame.height());

    let decoder = backend.build();
    println!("Decoder: {}", backend);
    let preprocessed = Preprocessor::default().preprocess(&frame);

    for (name, view) in [("binarized", &preprocessed.binarized), ("raw", &frame)] {
        let start = Instant::now();
        let symbols = decoder.decode(view);
        println!("{}: {} symbols in {:?}", name, symbols.len(), start.elapsed());
        for (i, symbol) in symbols.iter().enumerate() {
            println!(
                "  {} {}: rect=({}, {}, {}x{}) payload={}",
                symbol.kind,
                i,
                symbol.rect.left,
                symbol.rect.top,
                symbol.rect.width,
                symbol.rect.height,
                symbol.text()
            );
        }
    }
    Ok(())
}

fn stats_cmd(image: &Path, max_dim: Option<u32>) -> Result<(), String> {
    let frame = load_rgb(image, max_dim)
        .map_err(|e| format!("Failed to load image {}: {}", image.display(), e))?;
    println!("Image: {} ({}x{})", image.display(), frame.width(), frame.height());

    let preprocessed = Preprocessor::default().preprocess(&frame);
    for (name, view) in [
        ("Grayscale", &preprocessed.grayscale),
        ("Low-pass", &preprocessed.blurred),
        ("High-pass", &preprocessed.edges),
    ] {
        let stats = grayscale_stats(view.to_luma().as_raw());
        println!("{} range: {}-{}, average: {}", name, stats.min, stats.max, stats.avg);
    }

    let stats = binary_stats(preprocessed.binarized.to_luma().as_raw());
    println!(
        "Binarized: white_pixels={} total={} white_ratio={:.2}%",
        stats.white_pixels,
        stats.total_pixels,
        stats.white_ratio * 100.0
    );

    let otsu = otsu_stats(preprocessed.grayscale.to_luma().as_raw());
    println!(
        "Otsu: threshold={} white_pixels={} white_ratio={:.2}%",
        otsu.threshold,
        otsu.binary.white_pixels,
        otsu.binary.white_ratio * 100.0
    );
    Ok(())
}
