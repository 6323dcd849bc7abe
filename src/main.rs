use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixel_dither::{
    parse_palette_spec, Color, ColorMetric, Configuration, DitherMethod, PaletteMode,
    PaletteSource, PaletteSpec, PixelBuffer, PresetPalette, ResampleMethod,
};
use pixelforge::codec;
use pixelforge::models::{
    aspect_fit_height, aspect_fit_width, EngineRequest, EngineResponse, Settings,
};
use pixelforge::services::EngineWorker;

#[derive(Parser)]
#[command(name = "pixelforge")]
#[command(about = "Palette quantization and dithering for pixel art")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image to a palette-constrained PNG
    Process(ProcessArgs),
    /// Suggest colors missing from a palette
    Suggest {
        /// Source PNG
        #[arg(short, long)]
        input: PathBuf,

        /// Existing palette as hex colors (e.g. "#000000, #FFFFFF")
        #[arg(short, long, default_value = "")]
        palette: String,

        /// Preset palette to include in the existing colors (repeatable)
        #[arg(long)]
        preset: Vec<PresetPalette>,

        /// Number of colors to suggest
        #[arg(short, long, default_value_t = 4)]
        count: usize,

        /// Prefer perceptually distinct suggestions
        #[arg(long)]
        distinct: bool,

        /// Color distance metric
        #[arg(short, long, default_value = "oklab")]
        metric: ColorMetric,
    },
    /// List the built-in preset palettes
    Presets,
}

#[derive(Args)]
struct ProcessArgs {
    /// Source PNG
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Settings file (overrides PIXELFORGE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named profile from the settings file
    #[arg(long)]
    profile: Option<String>,

    /// Target width; derived from the aspect ratio when only --height is set
    #[arg(long)]
    width: Option<u32>,

    /// Target height; derived from the aspect ratio when only --width is set
    #[arg(long)]
    height: Option<u32>,

    /// Resampling kernel: nearest, bilinear, lanczos
    #[arg(long)]
    resample: Option<ResampleMethod>,

    /// Dither method (e.g. floyd_steinberg, bayer8, cross_hatch)
    #[arg(short, long)]
    dither: Option<DitherMethod>,

    /// Dither strength, 0-100
    #[arg(short, long)]
    strength: Option<u8>,

    /// Scan error diffusion rows in alternating directions
    #[arg(long)]
    serpentine: bool,

    /// Custom palette as hex colors (e.g. "#000000, #FFFFFF, #FF0000")
    #[arg(short, long, conflicts_with = "kmeans")]
    palette: Option<String>,

    /// Preset palette (repeatable)
    #[arg(long, conflicts_with = "kmeans")]
    preset: Vec<PresetPalette>,

    /// Extract a K color palette from the image instead
    #[arg(long)]
    kmeans: Option<usize>,

    /// Color distance metric: cie76, cie94, ciede2000, oklab
    #[arg(short, long)]
    metric: Option<ColorMetric>,

    /// Write color usage statistics as JSON
    #[arg(long)]
    stats: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => run_process_command(args).await,
        Commands::Suggest {
            input,
            palette,
            preset,
            count,
            distinct,
            metric,
        } => run_suggest_command(input, &palette, &preset, count, distinct, metric).await,
        Commands::Presets => {
            run_presets_command();
            Ok(())
        }
    }
}

async fn run_process_command(args: ProcessArgs) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::from_env(),
    };
    let base = settings.resolve(args.profile.as_deref())?;

    let source = codec::read_png(&args.input)?;
    let config = apply_overrides(base, &args, &source);
    tracing::info!(
        input = %args.input.display(),
        width = config.target_width,
        height = config.target_height,
        dither = %config.dither,
        metric = %config.color_metric,
        "Processing"
    );

    let request = EngineRequest::Process {
        source,
        settings: config,
    };
    let response = with_worker(request).await?;
    match response {
        EngineResponse::Processed {
            result,
            generated_palette,
            color_stats,
        } => {
            codec::write_png(&args.output, &result)?;
            if let Some(colors) = generated_palette {
                println!("Generated palette: {}", join_colors(&colors));
            }
            if let Some(path) = &args.stats {
                std::fs::write(path, serde_json::to_string_pretty(&color_stats)?)?;
            }
            println!(
                "Wrote {} ({}x{}, {} colors)",
                args.output.display(),
                result.width(),
                result.height(),
                color_stats.len()
            );
            Ok(())
        }
        EngineResponse::Error { message } => anyhow::bail!(message),
        other => anyhow::bail!("Unexpected engine response: {other:?}"),
    }
}

async fn run_suggest_command(
    input: PathBuf,
    palette: &str,
    presets: &[PresetPalette],
    count: usize,
    distinct: bool,
    metric: ColorMetric,
) -> anyhow::Result<()> {
    let source = codec::read_png(&input)?;
    let mut existing: Vec<Color> = presets
        .iter()
        .flat_map(|p| p.colors().iter().copied())
        .collect();
    existing.extend(parse_palette_spec(palette));

    let request = EngineRequest::Suggest {
        source,
        palette: existing,
        metric,
        count,
        prefer_distinct: distinct,
    };
    let response = with_worker(request).await?;
    match response {
        EngineResponse::Suggestions { colors } => {
            for color in colors {
                println!("{color}");
            }
            Ok(())
        }
        EngineResponse::Error { message } => anyhow::bail!(message),
        other => anyhow::bail!("Unexpected engine response: {other:?}"),
    }
}

fn run_presets_command() {
    for preset in PresetPalette::ALL {
        println!("{:<12} {}", preset.name(), join_colors(preset.colors()));
    }
}

/// Run one request on a fresh worker, then shut the worker down.
async fn with_worker(request: EngineRequest) -> anyhow::Result<EngineResponse> {
    let (worker, handle) = EngineWorker::spawn()?;
    let envelope = handle.request(request).await?;
    drop(handle);
    tokio::task::spawn_blocking(move || worker.join()).await?;
    Ok(envelope.response)
}

fn apply_overrides(
    mut config: Configuration,
    args: &ProcessArgs,
    source: &PixelBuffer,
) -> Configuration {
    let (src_w, src_h) = (source.width(), source.height());
    match (args.width, args.height) {
        (Some(w), Some(h)) => {
            config.target_width = w;
            config.target_height = h;
        }
        (None, Some(h)) => {
            config.target_width = aspect_fit_width(src_w, src_h, h);
            config.target_height = h;
        }
        (Some(w), None) => {
            config.target_width = w;
            config.target_height = aspect_fit_height(src_w, src_h, w);
        }
        (None, None) => {}
    }

    if let Some(resample) = args.resample {
        config.resampling = resample;
    }
    if let Some(dither) = args.dither {
        config.dither = dither;
    }
    if let Some(strength) = args.strength {
        config.dither_strength = strength;
    }
    if args.serpentine {
        config.serpentine = true;
    }
    if let Some(metric) = args.metric {
        config.color_metric = metric;
    }

    if let Some(colors) = args.kmeans {
        config.palette = PaletteSource::Clustered { colors };
    } else if args.palette.is_some() || !args.preset.is_empty() {
        let mode = match (&args.palette, args.preset.is_empty()) {
            (Some(_), false) => PaletteMode::Merge,
            (Some(_), true) => PaletteMode::Custom,
            (None, _) => PaletteMode::Preset,
        };
        config.palette = PaletteSource::Fixed(PaletteSpec {
            mode,
            presets: args.preset.clone(),
            custom: args.palette.clone().unwrap_or_default(),
        });
    }
    config
}

fn join_colors(colors: &[Color]) -> String {
    colors
        .iter()
        .map(Color::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
