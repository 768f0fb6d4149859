use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sketchbook", version)]
struct Cli {
    /// Log at debug level (`RUST_LOG` overrides it).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the reference scene (gray background, red square, greeting) to an image.
    Frame(FrameArgs),
    /// Compare two images within a per-channel tolerance.
    Diff(DiffArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Output image; the extension picks PNG, JPEG or GIF.
    #[arg(long)]
    out: PathBuf,

    /// Runtime config JSON; `SKETCHBOOK_*` environment variables are applied on top.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 200)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 200)]
    height: u32,

    /// Font file for the greeting; without one the text is skipped.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DiffArgs {
    got: PathBuf,
    want: PathBuf,

    /// Allowed difference per channel, as a fraction of 255.
    #[arg(long, default_value_t = 0.1)]
    delta: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Diff(args) => cmd_diff(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let base = match &args.config {
        Some(path) => sketchbook::RuntimeConfig::from_json_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => sketchbook::RuntimeConfig::default(),
    };
    let config = sketchbook::RuntimeConfig {
        width: args.width,
        height: args.height,
        frame_interval_ms: None,
        ..base
    }
    .with_env_overrides()
    .context("apply environment overrides")?;

    let mut rt = sketchbook::Runtime::new(config).context("create runtime")?;
    if let Some(font) = &args.font {
        rt.load_font(font)
            .with_context(|| format!("load font '{}'", font.display()))?;
    }

    let mut sketch = sketchbook::FnSketch::new()
        .setup(|rt| {
            rt.background(sketchbook::Color::gray(220));
            rt.fill(sketchbook::Color::rgb(255, 0, 0));
            Ok(())
        })
        .draw(|rt| {
            rt.rect(20.0, 20.0, 160.0, 160.0);
            rt.text_size(25.0);
            rt.text("Hello, World!", 25.0, 100.0);
            Ok(())
        });
    sketchbook::harness::ScriptedRun::new()
        .run(&mut rt, &mut sketch)
        .context("run reference scene")?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    rt.screenshot(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    sketchbook::harness::compare_files(&args.got, &args.want, args.delta).with_context(|| {
        format!(
            "compare '{}' with '{}'",
            args.got.display(),
            args.want.display()
        )
    })?;
    eprintln!("images match within {}", args.delta);
    Ok(())
}
