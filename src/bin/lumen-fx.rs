use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use lumen_fx::{
    best_foreground_for, compose, contrast_ratio, denormalize, normalize_value,
    particle_directives, to_hex, validate, ColorPalette, CssSerializer, DirectiveSerializer,
    RuntimeContext, SurfaceTemplate, DEFAULT_SEED,
};
use serde::de::DeserializeOwned;

#[derive(Parser, Debug)]
#[command(name = "lumen-fx", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a flat configuration into styles.
    Compose(ComposeArgs),
    /// Report warnings and recommendations for a configuration.
    Validate(ConfigArgs),
    /// Print the canonical form of a configuration with every field filled in.
    Normalize(ConfigArgs),
    /// Pick a readable foreground for a background color.
    Contrast {
        /// Background color: hex, rgb()/rgba(), or a gradient string.
        background: String,
    },
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Input flat configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input flat configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Palette JSON (`background`, `text`, `primary`, `secondary`, `accent`).
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Template JSON (`cornerRadius`, `boxShadow`).
    #[arg(long)]
    template: Option<PathBuf>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Css)]
    format: Format,

    /// Single-line CSS.
    #[arg(long)]
    minify: bool,

    /// Particle seed.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long)]
    mobile: bool,

    #[arg(long)]
    presenting: bool,

    #[arg(long)]
    reduced_motion: bool,

    /// Battery level in percent.
    #[arg(long)]
    battery: Option<f32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// CSS rules, including per-particle placement.
    Css,
    /// The full bundle as JSON.
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Normalize(args) => cmd_normalize(args),
        Command::Contrast { background } => cmd_contrast(&background),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write stdout")?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n").context("write stdout")?;
            }
            Ok(())
        }
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config: serde_json::Value = read_json(&args.in_path, "configuration")?;
    let palette: ColorPalette = match &args.palette {
        Some(path) => read_json(path, "palette")?,
        None => ColorPalette::default(),
    };
    let template: SurfaceTemplate = match &args.template {
        Some(path) => read_json(path, "template")?,
        None => SurfaceTemplate::default(),
    };

    let mut runtime = RuntimeContext::new();
    runtime.is_mobile = args.mobile;
    runtime.is_presenting = args.presenting;
    runtime.reduced_motion = args.reduced_motion;
    runtime.battery_level = args.battery;

    let bundle = compose(&config, &palette, &template, &runtime, args.seed)
        .with_context(|| format!("compose '{}'", args.in_path.display()))?;

    for warning in &bundle.validation.warnings {
        tracing::warn!("{warning}");
    }
    for recommendation in &bundle.validation.recommendations {
        tracing::info!("{recommendation}");
    }

    let text = match args.format {
        Format::Css => {
            let mut directives = bundle.directives.clone();
            directives.extend(particle_directives(&bundle.particles));
            let serializer = CssSerializer {
                minify: args.minify,
            };
            serializer.serialize(&directives)
        }
        Format::Json => serde_json::to_string_pretty(&bundle).context("serialize bundle")?,
    };
    write_output(args.out.as_deref(), &text)
}

fn cmd_validate(args: ConfigArgs) -> anyhow::Result<()> {
    let config: serde_json::Value = read_json(&args.in_path, "configuration")?;
    let state = normalize_value(&config)
        .with_context(|| format!("normalize '{}'", args.in_path.display()))?;
    let report = validate(&state);
    let text = serde_json::to_string_pretty(&report).context("serialize report")?;
    write_output(None, &text)?;
    if !report.is_valid {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_normalize(args: ConfigArgs) -> anyhow::Result<()> {
    let config: serde_json::Value = read_json(&args.in_path, "configuration")?;
    let state = normalize_value(&config)
        .with_context(|| format!("normalize '{}'", args.in_path.display()))?;
    let text = denormalize(&state)
        .to_json_pretty()
        .context("serialize configuration")?;
    write_output(None, &text)
}

fn cmd_contrast(background: &str) -> anyhow::Result<()> {
    let base = lumen_fx::extract_base_color(background);
    let foreground = best_foreground_for(background);
    let text = format!(
        "{} on {} (contrast {:.2}:1)",
        to_hex(foreground),
        to_hex(base),
        contrast_ratio(foreground, base)
    );
    write_output(None, &text)
}
