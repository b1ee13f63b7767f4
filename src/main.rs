use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use retro_tape::{
    config::Config,
    styles::{FramePipeline, Style, TapeSpeed, VhsParams},
    video::{Frame, FrameProcessor},
};

#[derive(Parser)]
#[command(
    name = "retro-tape",
    version,
    about = "Give still frames or frame sequences an analog videotape look",
    long_about = "Retro-Tape runs decoded frames through a single pass of VHS-style degradation: frequency-domain ringing, tape noise, chroma bleed, tape-speed blur and output sharpening."
)]
struct Cli {
    /// Input image, or a directory of numbered frame images
    #[arg(short, long)]
    input: PathBuf,

    /// Output image, or a directory when the input is a directory
    #[arg(short, long)]
    output: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tape parameters as a JSON object; missing keys use defaults
    #[arg(short, long)]
    params: Option<String>,

    /// Tape speed preset (SP, LP, EP)
    #[arg(short, long)]
    tape_speed: Option<TapeSpeed>,

    /// Seed for the noise stages
    #[arg(long)]
    seed: Option<u64>,

    /// Number of worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    info!("Starting Retro-Tape v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    info!("Tape speed: {}, ringing: {}", config.vhs.tape_speed, config.vhs.enable_ringing);

    let inputs = collect_inputs(&cli.input)?;
    info!("Loading {} frame(s) from {:?}", inputs.len(), cli.input);

    let frames = inputs
        .iter()
        .map(|path| load_frame(path))
        .collect::<Result<Vec<_>>>()?;

    let pipeline = FramePipeline::new();
    info!("Using {} style", pipeline.name());

    let processor = FrameProcessor::new(&config.processing)?;
    let (taped, _stats) = processor.process_frames(&pipeline, &config.vhs, &frames, &AtomicBool::new(false))?;

    if cli.input.is_dir() {
        std::fs::create_dir_all(&cli.output)
            .with_context(|| format!("Failed to create output directory {:?}", cli.output))?;
        for (path, frame) in inputs.iter().zip(&taped) {
            let name = path.file_stem().context("Frame file has no name")?;
            let target = cli.output.join(name).with_extension("png");
            save_frame(frame, &target)?;
        }
    } else if let Some(frame) = taped.first() {
        save_frame(frame, &cli.output)?;
    }

    info!("Done! Output saved to: {:?}", cli.output);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Config::from_file(path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(json) = &cli.params {
        config.vhs = VhsParams::from_json(json)?;
    }
    if let Some(speed) = cli.tape_speed {
        config.vhs.tape_speed = speed;
    }
    if let Some(seed) = cli.seed {
        config.processing.seed = Some(seed);
    }
    if let Some(threads) = cli.threads {
        config.processing.threads = threads;
    }

    config.validate()?;
    Ok(config)
}

fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        bail!("Input does not exist: {:?}", input);
    }
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut frames: Vec<PathBuf> = std::fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    frames.sort();

    if frames.is_empty() {
        bail!("No frame images found in {:?}", input);
    }
    Ok(frames)
}

fn load_frame(path: &Path) -> Result<Frame> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode {:?}", path))?
        .to_rgb8();
    Ok(Frame::from_rgb_image(&image)?)
}

fn save_frame(frame: &Frame, path: &Path) -> Result<()> {
    frame
        .to_rgb_image()
        .save(path)
        .with_context(|| format!("Failed to write {:?}", path))
}
