//! Canvas Layout CLI
//!
//! Usage:
//!   canvas-layout [OPTIONS] <COMMAND> [FILE]
//!
//! Commands:
//!   analyze   Occupied and empty regions, clusters, density and bounds
//!   relate    Relationships, groups and the suggested strategy
//!   place     Position for one new element
//!   arrange   Layout plan for the pending batch
//!
//! Input is a JSON canvas snapshot (read from stdin when FILE is omitted);
//! output is pretty-printed JSON on stdout. Set RUST_LOG for diagnostics.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use canvas_layout::placement::place_in_nearest_drawn_region;
use canvas_layout::relationship::{calculate_grouping_score, suggest_layout_strategy_with};
use canvas_layout::{
    analyze_canvas, detect_relationships, find_optimal_position, place_batch, plan_batch,
    suggest_groupings, Anchor, ArrangeOptions, BatchRequest, CanvasSnapshot,
    CanvasSnapshotProvider, DataBound, ElementType, FlowDirection, Group, LayoutConfig,
    PendingElement, Point, Relationship, Strategy,
};

#[derive(Parser)]
#[command(name = "canvas-layout")]
#[command(about = "Spatial layout and relationship engine for dashboard canvases")]
struct Cli {
    /// Layout configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze the placed elements of a snapshot
    Analyze(InputArgs),

    /// Detect relationships and suggest a strategy (pending elements, else placed ones)
    Relate(InputArgs),

    /// Find a position for one new element
    Place {
        #[command(flatten)]
        input: InputArgs,

        /// Element type: chart, kpi, table or textbox
        #[arg(short = 't', long = "type")]
        element_type: ElementType,

        /// Preferred anchor: top-left, top-right, bottom-left, bottom-right or center
        #[arg(short, long, default_value = "top-left")]
        anchor: Anchor,

        /// Drop point; tries the nearest empty drawn region first
        #[arg(long, num_args = 2, value_names = ["X", "Y"])]
        near: Option<Vec<f64>>,
    },

    /// Arrange the pending elements of a snapshot
    Arrange {
        #[command(flatten)]
        input: InputArgs,

        /// Strategy name; suggested from the batch when omitted
        #[arg(short, long)]
        strategy: Option<String>,

        /// Grid columns
        #[arg(long)]
        cols: Option<usize>,

        /// Spacing between elements
        #[arg(long)]
        gap: Option<f64>,

        /// Flow direction: horizontal or vertical
        #[arg(long)]
        direction: Option<FlowDirection>,

        /// Shift the plan below the elements already on the canvas
        #[arg(long)]
        below: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Snapshot file (reads from stdin if not provided)
    input: Option<PathBuf>,
}

/// A canvas snapshot plus the batch waiting to be arranged
#[derive(Debug, Default, Deserialize)]
struct CliInput {
    #[serde(flatten)]
    snapshot: CanvasSnapshot,
    #[serde(default)]
    pending: Vec<PendingElement>,
}

#[derive(Serialize)]
struct RelateOutput {
    relationships: Vec<Relationship>,
    groups: Vec<Group>,
    grouping_score: f64,
    strategy: Strategy,
    reason: &'static str,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    if let Err(message) = run(cli.command, &config) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn run(command: Command, config: &LayoutConfig) -> Result<(), String> {
    match command {
        Command::Analyze(args) => {
            let input = read_input(args.input.as_deref())?;
            let elements = input.snapshot.elements().map_err(|e| e.to_string())?;
            let analysis = analyze_canvas(&elements, input.snapshot.viewport_bounds(), config);
            print_json(&analysis)
        }
        Command::Relate(args) => {
            let input = read_input(args.input.as_deref())?;
            if input.pending.is_empty() {
                let elements = input.snapshot.elements().map_err(|e| e.to_string())?;
                print_json(&relate(&elements, config))
            } else {
                print_json(&relate(&input.pending, config))
            }
        }
        Command::Place {
            input,
            element_type,
            anchor,
            near,
        } => {
            let input = read_input(input.input.as_deref())?;
            let elements = input.snapshot.elements().map_err(|e| e.to_string())?;
            let drawn = match near.as_deref() {
                Some(&[x, y]) => place_in_nearest_drawn_region(
                    Point::new(x, y),
                    config.default_size(element_type),
                    &input.snapshot.annotation_regions(),
                    &elements,
                ),
                _ => None,
            };
            let placement = drawn.unwrap_or_else(|| {
                find_optimal_position(element_type, anchor, &elements, &input.snapshot, config)
            });
            print_json(&placement)
        }
        Command::Arrange {
            input,
            strategy,
            cols,
            gap,
            direction,
            below,
        } => {
            let input = read_input(input.input.as_deref())?;
            let request = BatchRequest {
                strategy: None,
                strategy_name: strategy,
                options: ArrangeOptions {
                    cols,
                    gap,
                    direction,
                    ..ArrangeOptions::default()
                },
            };
            let batch = if below {
                let elements = input.snapshot.elements().map_err(|e| e.to_string())?;
                place_batch(&input.pending, &request, &elements, config)
            } else {
                plan_batch(&input.pending, &request, config)
            }
            .map_err(|e| e.to_string())?;
            print_json(&batch)
        }
    }
}

fn relate<T: DataBound>(elements: &[T], config: &LayoutConfig) -> RelateOutput {
    let relationships = detect_relationships(elements);
    let groups = suggest_groupings(elements, &relationships, config);
    let ids: Vec<&str> = elements.iter().map(DataBound::id).collect();
    let suggestion = suggest_layout_strategy_with(elements, &relationships);
    RelateOutput {
        grouping_score: calculate_grouping_score(&ids, &relationships),
        strategy: suggestion.strategy,
        reason: suggestion.reason,
        relationships,
        groups,
    }
}

fn read_input(path: Option<&Path>) -> Result<CliInput, String> {
    let source = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("reading file '{}': {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("reading from stdin: {}", e))?;
            buffer
        }
    };
    if source.trim().is_empty() {
        return Ok(CliInput::default());
    }
    serde_json::from_str(&source).map_err(|e| format!("invalid snapshot JSON: {}", e))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
