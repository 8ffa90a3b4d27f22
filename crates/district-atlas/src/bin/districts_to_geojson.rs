//! District CSV to GeoJSON converter
//!
//! Usage:
//!   districts-to-geojson --input District_FloodImpact.csv \
//!                        --output data/india_flood.geojson

use anyhow::Result;
use clap::Parser;
use district_atlas::{load_districts, to_feature_collection};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "districts-to-geojson",
    about = "Convert a district flood-impact CSV into a GeoJSON point overlay"
)]
struct Args {
    /// District flood-impact CSV (District, Year, Latitude, Longitude, FloodedArea/Impact)
    #[arg(short, long, default_value = "District_FloodImpact.csv")]
    input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, default_value = "data/india_flood.geojson")]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let districts = load_districts(&args.input)?;
    let geojson = to_feature_collection(&districts);

    let file = File::create(&args.output)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &geojson)?;

    info!("Converted {} districts to {:?}", districts.len(), args.output);
    Ok(())
}
