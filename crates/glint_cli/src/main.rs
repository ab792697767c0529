//! Glint command-line renderer.
//!
//! Loads a JSON render request, renders it on a background worker (or with
//! rayon when `--parallel` is given) and writes the frame as a PNG.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use glint_core::{load_request, RenderRequest, StreamMode};
use glint_renderer::{build_world, render_parallel, Camera, RenderEvent, RenderWorker};

#[derive(Parser, Debug)]
#[command(name = "glint", version, about = "Render a sphere scene with the Glint path tracer")]
struct Args {
    /// JSON render request: {"camera": {...}, "scene": [...], "seed": N}
    scene: PathBuf,

    /// Where to write the PNG
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Seed for reproducible renders; overrides the request
    #[arg(long)]
    seed: Option<u64>,

    /// Image width in pixels; height follows the aspect ratio
    #[arg(long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounces
    #[arg(long)]
    depth: Option<u32>,

    /// What the worker streams back while rendering
    #[arg(long, value_enum)]
    stream: Option<Stream>,

    /// Render on all cores with rayon instead of the background worker
    #[arg(long)]
    parallel: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Stream {
    Rows,
    Frame,
}

impl From<Stream> for StreamMode {
    fn from(stream: Stream) -> Self {
        match stream {
            Stream::Rows => StreamMode::Rows,
            Stream::Frame => StreamMode::Frame,
        }
    }
}

/// Finished frame as RGBA bytes.
struct Frame {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    log::info!("Starting Glint");

    let mut request = load_request(&args.scene)
        .with_context(|| format!("Failed to load {}", args.scene.display()))?;
    apply_overrides(&args, &mut request);
    request.validate().context("Invalid settings after overrides")?;

    let start = Instant::now();
    let frame = if args.parallel {
        render_with_rayon(&request)?
    } else {
        render_with_worker(request)?
    };
    log::info!("Rendered {}x{} in {:?}", frame.width, frame.height, start.elapsed());

    save_png(&args.output, frame)?;
    log::info!("Saved to {}", args.output.display());

    Ok(())
}

fn apply_overrides(args: &Args, request: &mut RenderRequest) {
    let camera = &mut request.camera;

    if let Some(width) = args.width {
        let aspect_ratio = camera.image_width as f32 / camera.image_height() as f32;
        *camera = camera.clone().with_aspect_ratio(aspect_ratio, width);
    }
    if let Some(samples) = args.samples {
        camera.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        camera.max_depth = depth;
    }
    if let Some(seed) = args.seed {
        request.seed = Some(seed);
    }
    if let Some(stream) = args.stream {
        request.stream = stream.into();
    }
}

fn render_with_worker(request: RenderRequest) -> Result<Frame> {
    let worker = RenderWorker::spawn()?;
    worker.submit(request)?;

    let mut height = 0;
    let mut last_reported = 0;
    loop {
        match worker.recv()? {
            RenderEvent::Started { width, height: h } => {
                log::info!("Rendering {}x{}", width, h);
                height = h;
            }
            RenderEvent::Row { y, .. } => {
                let percent = (y + 1) * 100 / height.max(1);
                if percent >= last_reported + 10 {
                    log::info!("{}% ({} of {} rows)", percent, y + 1, height);
                    last_reported = percent - percent % 10;
                }
            }
            RenderEvent::Finished { width, height, rgba } => {
                return Ok(Frame { width, height, rgba });
            }
            RenderEvent::Failed(why) => bail!("Render failed: {}", why),
        }
    }
}

fn render_with_rayon(request: &RenderRequest) -> Result<Frame> {
    let camera = Camera::try_new(&request.camera)?;
    let world = build_world(&request.scene)?;
    let seed = request.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{} at {} spp on {} threads, seed {}",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel(),
        rayon::current_num_threads(),
        seed
    );
    let image = render_parallel(&camera, &world, seed);

    Ok(Frame {
        width: image.width,
        height: image.height,
        rgba: image.to_rgba(),
    })
}

fn save_png(path: &Path, frame: Frame) -> Result<()> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba)
        .context("Frame size does not match its dimensions")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}
