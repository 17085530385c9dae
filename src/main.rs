mod config;
mod export;
mod help;
mod output;
mod raster;
mod session;
mod settings;
mod terminal;
mod tree;
mod view;

use clap::{Args, Parser, Subcommand};
use config::{CanvasConfig, TreeConfig, TreeParameters, MAX_CANVAS_SIDE, MIN_CANVAS_SIDE};
use session::{apply_field, Field};
use settings::Settings;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fractree")]
#[command(version)]
#[command(about = "Randomized fractal trees drawn in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TreeArgs {
    /// Recursion depth (levels below the trunk)
    #[arg(short, long)]
    depth: Option<String>,

    /// Chance that a branch spawns children (0-1)
    #[arg(short, long, allow_hyphen_values = true)]
    probability: Option<String>,

    /// Base branching angle in degrees
    #[arg(short, long, allow_hyphen_values = true)]
    angle: Option<String>,

    /// Children per branch (at least 2)
    #[arg(short, long, allow_hyphen_values = true)]
    branches: Option<String>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Logical canvas width
    #[arg(long)]
    width: Option<f64>,

    /// Logical canvas height
    #[arg(long)]
    height: Option<f64>,

    /// Maximum segments per tree (0 = unlimited)
    #[arg(long)]
    max_segments: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive tree with editable parameters
    View {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Print one tree to stdout
    Print {
        #[command(flatten)]
        tree: TreeArgs,

        /// Output width in columns (default: terminal width)
        #[arg(long)]
        cols: Option<u16>,

        /// Output height in rows (default: terminal height)
        #[arg(long)]
        rows: Option<u16>,
    },

    /// Render one tree to a PNG file
    Export {
        #[command(flatten)]
        tree: TreeArgs,

        /// Destination image path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Settings file first, then command-line values on top
fn build_config(args: TreeArgs) -> TreeConfig {
    let settings = Settings::load();
    let mut params: TreeParameters = settings.params();
    let mut canvas = settings.canvas();

    let raw = [
        (Field::Depth, args.depth),
        (Field::Probability, args.probability),
        (Field::Angle, args.angle),
        (Field::Branches, args.branches),
    ];
    for (field, value) in raw {
        if let Some(value) = value {
            if !apply_field(&mut params, field, &value) {
                tracing::warn!(field = field.label(), value = %value, "ignoring unparsable value");
            }
        }
    }

    for (name, value, side) in [
        ("width", args.width, &mut canvas.width),
        ("height", args.height, &mut canvas.height),
    ] {
        match value {
            Some(v) if CanvasConfig::valid_side(v) => *side = v,
            Some(v) => tracing::warn!(
                field = name,
                value = v,
                min = MIN_CANVAS_SIDE,
                max = MAX_CANVAS_SIDE,
                "ignoring canvas size out of range"
            ),
            None => {}
        }
    }
    if let Some(max) = args.max_segments {
        canvas.max_segments = max;
    }

    TreeConfig {
        params,
        canvas,
        seed: args.seed,
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fractree=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::View { tree } => view::run(build_config(tree))?,
        Commands::Print { tree, cols, rows } => output::run_print(&build_config(tree), cols, rows)?,
        Commands::Export { tree, output } => output::run_export(&build_config(tree), &output)?,
    }

    Ok(())
}
