//! GeoCluster CLI - distance-based point clustering

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geocluster_algorithms::vector::{cluster_points_with_feedback, ClusterParams};
use geocluster_core::io::{read_points, write_points};
use geocluster_core::{Feedback, PointLayer};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "geocluster")]
#[command(author, version, about = "Distance-based point clustering", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a point layer
    Info {
        /// Input GeoJSON point layer
        input: PathBuf,
    },
    /// Cluster points lying within a buffer distance of one another
    Cluster {
        /// Input GeoJSON point layer
        input: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        /// Buffer distance in CRS units
        #[arg(short, long, default_value = "0.00005")]
        distance: f64,
        /// Segments per quarter circle for buffer curve approximation
        #[arg(short, long, default_value = "5")]
        segments: usize,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn percent_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green} {pos:>3}%")
            .unwrap(),
    );
    pb
}

/// Drives an indicatif bar from the library's progress hook
struct BarFeedback(ProgressBar);

impl Feedback for BarFeedback {
    fn progress(&self, percent: f64) {
        self.0.set_position(percent.round() as u64);
    }
}

fn read_layer(path: &PathBuf) -> Result<PointLayer> {
    let pb = spinner("Reading layer...");
    let layer = read_points(path).context("Failed to read input layer")?;
    pb.finish_and_clear();
    info!("Input: {} features, {}", layer.len(), layer.crs());
    Ok(layer)
}

fn write_layer(layer: &PointLayer, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_points(layer, path).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let layer = read_layer(&input)?;
            let with_geometry = layer.iter().filter(|f| f.geometry.is_some()).count();

            println!("File: {}", input.display());
            println!("Features: {} ({} with geometry)", layer.len(), with_geometry);
            println!("CRS: {}", layer.crs());
            println!("Fields:");
            for field in layer.schema().iter() {
                println!("  {} ({:?})", field.name, field.ty);
            }
        }

        Commands::Cluster {
            input,
            output,
            distance,
            segments,
        } => {
            let layer = read_layer(&input)?;
            let params = ClusterParams { distance, segments };

            let pb = percent_bar();
            let start = Instant::now();
            let result = cluster_points_with_feedback(&layer, &params, &BarFeedback(pb.clone()))
                .context("Failed to cluster points")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            info!(
                "Assigned {} features in {:.2?}",
                result.len(),
                elapsed
            );
            write_layer(&result, &output)?;
            done("Clustered layer", &output, elapsed);
        }
    }

    Ok(())
}
