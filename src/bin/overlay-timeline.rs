use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use overlay_timeline::{
    BrandProfile, CompositionDescriptor, InsightData, RenderConfig, Resolver, TimelineReport,
    compile_insights, cue_sheet,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "overlay-timeline", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the timeline and validate it against the render config.
    Check(InputArgs),
    /// Print the resolved layers at one frame as JSON.
    Layers(LayersArgs),
    /// Print the cue sheet as JSON.
    Cues(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Brand profile JSON.
    #[arg(long)]
    brand: PathBuf,

    /// Insight data JSON.
    #[arg(long)]
    insights: PathBuf,

    /// Render config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LayersArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame index (0-based).
    #[arg(long, allow_hyphen_values = true)]
    frame: i64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Layers(args) => cmd_layers(args),
        Command::Cues(args) => cmd_cues(args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct Loaded {
    descriptor: CompositionDescriptor,
    report: TimelineReport,
}

fn load(args: &InputArgs) -> anyhow::Result<Loaded> {
    let config = match &args.config {
        Some(path) => RenderConfig::from_path(path)
            .with_context(|| format!("load render config '{}'", path.display()))?,
        None => RenderConfig::default(),
    };
    let brand = BrandProfile::from_path(&args.brand)
        .with_context(|| format!("load brand profile '{}'", args.brand.display()))?;
    let insights = InsightData::from_path(&args.insights)
        .with_context(|| format!("load insight data '{}'", args.insights.display()))?;

    let report = compile_insights(brand, &insights, config.fps()?, &config.layout)
        .context("build timeline")?;
    let descriptor = config.descriptor(report.timeline.total_frames())?;
    descriptor
        .validate(&report.timeline)
        .context("validate composition descriptor")?;

    Ok(Loaded { descriptor, report })
}

fn cmd_check(args: InputArgs) -> anyhow::Result<()> {
    let Loaded { descriptor, report } = load(&args)?;
    let t = &report.timeline;

    println!("brand: {}", t.brand().name());
    println!(
        "timeline: {} frames @ {} ({:.3}s)",
        t.total_frames(),
        t.fps(),
        t.duration_secs()
    );
    match t.media() {
        Some(m) => println!(
            "media: {} [{}, {})",
            m.source,
            m.window.start_frame,
            m.window.end_frame()
        ),
        None => println!("media: none"),
    }
    println!(
        "events: {} accepted, {} dropped, {} rejected",
        t.len(),
        report.dropped.len(),
        report.rejected.len()
    );
    println!(
        "descriptor: {}x{} {} {} -> {} (overwrite: {})",
        descriptor.width,
        descriptor.height,
        descriptor.codec,
        descriptor.pixel_format,
        descriptor.output_dir.display(),
        descriptor.overwrite
    );
    for d in &report.dropped {
        println!("warning: {d}");
    }
    for e in &report.rejected {
        println!("rejected: {e}");
    }
    Ok(())
}

fn cmd_layers(args: LayersArgs) -> anyhow::Result<()> {
    let Loaded { report, .. } = load(&args.input)?;
    let frame = Resolver::resolve(&report.timeline, args.frame)?;
    let json = serde_json::to_string_pretty(&frame).context("serialize resolved frame")?;
    println!("{json}");
    Ok(())
}

fn cmd_cues(args: InputArgs) -> anyhow::Result<()> {
    let Loaded { report, .. } = load(&args)?;
    let cues = cue_sheet(&report.timeline);
    let json = serde_json::to_string_pretty(&cues).context("serialize cue sheet")?;
    println!("{json}");
    Ok(())
}
