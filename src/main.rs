use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use rainbow::graph::ColoredTournament;
use rainbow::invariant::PathInvariant;
use rainbow::search::{SearchConfig, print_report, run_search, sample_forced};
use rainbow::validate::{validate_file, validate_known_witnesses};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "rainbow", version, about = "Search for colorings of K_n that force rainbow triangles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate orders N and N+1 and report new minimal forced colorings on N+1
    Search {
        /// Phase A vertex count
        #[arg(long, default_value_t = 4)]
        order: usize,
        /// Disjoint counter ranges per phase (default: available cores)
        #[arg(long)]
        shards: Option<usize>,
        /// Print the triangular table of each discovery
        #[arg(long)]
        print_graphs: bool,
    },
    /// Validate a persisted coloring, or the bundled witnesses when no file is given
    Validate {
        file: Option<PathBuf>,
    },
    /// Print a persisted coloring with its rainbow count and path invariant
    Show {
        file: PathBuf,
        /// Compress before printing
        #[arg(long)]
        compress: bool,
    },
    /// Compress uniformly random colorings and count those still forced
    Sample {
        #[arg(long)]
        order: usize,
        #[arg(long, default_value_t = 100_000)]
        samples: u64,
        /// Deterministic base seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        shards: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let defaults = SearchConfig::default();

    match cli.command {
        Command::Search {
            order,
            shards,
            print_graphs,
        } => {
            let cfg = SearchConfig {
                small_order: order,
                shards: shards.unwrap_or(defaults.shards),
                print_graphs,
            };
            let report = run_search(&cfg)?;
            print_report(&report, cfg.print_graphs);
        }
        Command::Validate { file: None } => {
            validate_known_witnesses().map_err(|e| anyhow!("validation failed: {e}"))?;
            println!("Validation OK: bundled witness colorings are correct.");
        }
        Command::Validate { file: Some(path) } => {
            let report = validate_file(&path)
                .with_context(|| format!("failed to validate {}", path.display()))?;
            println!("{report}");
        }
        Command::Show { file, compress } => {
            let mut graph = ColoredTournament::load_from_file(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            if compress {
                let forced = graph.partially_compress();
                println!("forced after compression: {forced}");
            }
            print!("{graph}");
            println!("rainbow triangles: {}", graph.number_of_rainbow_triangles());
            println!("hash: {}", graph.hash_code());
            for (v, row) in PathInvariant::compute(&graph).per_vertex().iter().enumerate() {
                println!("P[{v}] = {row:?}");
            }
        }
        Command::Sample {
            order,
            samples,
            seed,
            shards,
        } => {
            let seed = seed.unwrap_or_else(rand::random::<u64>);
            let report = sample_forced(order, samples, seed, shards.unwrap_or(defaults.shards));
            println!(
                "order {order}: {} of {} samples forced ({} distinct compressed colorings), seed {seed}",
                report.forced,
                report.samples,
                report.distinct.len()
            );
        }
    }
    Ok(())
}
