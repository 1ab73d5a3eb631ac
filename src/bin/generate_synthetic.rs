//! Synthetic export generator for the collection reporting dashboard
//!
//! Writes a plausible semicolon-delimited form export so the dashboard
//! and API can be exercised without hitting the aggregation service.
//!
//! Usage:
//!   cargo run --release --bin generate_synthetic -- [OPTIONS]
//!
//! Options:
//!   --days <N>          Reporting days to cover (default: 10)
//!   --start-date <D>    First reporting day, dd/mm/YYYY (default: 01/01/2024)
//!   --refusal-rate <F>  Probability a team reports a refusal (default: 0.15)
//!   --seed <N>          Random seed for reproducibility (optional)
//!   --output <PATH>     Output CSV path (default: data/synthetic_export.csv)

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use csv::WriterBuilder;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::path::PathBuf;

use rgeeci_reporting::models::CsvRecord;
use rgeeci_reporting::roster::TEAM_LEADERS;

/// Synthetic export generator for the field-collection dataset
#[derive(Parser, Debug)]
#[command(name = "generate_synthetic")]
#[command(about = "Generate a synthetic semicolon-delimited form export")]
struct Args {
    /// Number of reporting days to cover
    #[arg(long, default_value = "10")]
    days: u32,

    /// First reporting day (dd/mm/YYYY)
    #[arg(long, default_value = "01/01/2024")]
    start_date: String,

    /// Probability a team reports at least one refusal on a day
    #[arg(long, default_value = "0.15")]
    refusal_rate: f64,

    /// Probability a team skips reporting on a day
    #[arg(long, default_value = "0.10")]
    skip_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = "data/synthetic_export.csv")]
    output: PathBuf,
}

const LOCATIONS: &[(&str, &str, &str)] = &[
    ("GBEKE", "BOUAKE", "BOUAKE"),
    ("GBEKE", "BEOUMI", "BEOUMI"),
    ("GBEKE", "SAKASSOU", "SAKASSOU"),
    ("HAMBOL", "KATIOLA", "KATIOLA"),
];

fn main() -> Result<()> {
    let args = Args::parse();

    let start = NaiveDate::parse_from_str(&args.start_date, "%d/%m/%Y")?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_path(&args.output)?;

    let mut team_codes: Vec<&str> = TEAM_LEADERS.keys().copied().collect();
    team_codes.sort_unstable();

    let mut rows = 0usize;
    for day in 0..args.days {
        let date = start + Duration::days(i64::from(day));
        for (i, team_code) in team_codes.iter().enumerate() {
            if rng.gen_bool(args.skip_rate) {
                continue;
            }

            let (region, department, sub_prefecture) = LOCATIONS[i % LOCATIONS.len()];

            // One or two zones per day; an occasional sentinel day
            // where the team had no zone assigned.
            let zone_ids = if rng.gen_bool(0.05) {
                "0000".to_string()
            } else {
                let base = 1 + rng.gen_range(0..200) + i * 30;
                if rng.gen_bool(0.3) {
                    format!("{:04},{:04}", base, base + 1)
                } else {
                    format!("{:04}", base)
                }
            };

            let agent_units: [u32; 3] = [
                rng.gen_range(0..8),
                rng.gen_range(0..8),
                rng.gen_range(0..8),
            ];
            let total_units: u32 = agent_units.iter().sum();
            let formal_units = rng.gen_range(0..=total_units);
            let refusals = if rng.gen_bool(args.refusal_rate) {
                rng.gen_range(1..3)
            } else {
                0
            };

            writer.serialize(CsvRecord {
                team_code: team_code.to_string(),
                report_date: date.format("%d/%m/%Y").to_string(),
                region: region.to_string(),
                department: department.to_string(),
                sub_prefecture: sub_prefecture.to_string(),
                zone_ids: Some(zone_ids),
                formal_units,
                informal_units: total_units - formal_units,
                total_units,
                refusals,
                partials: rng.gen_range(0..2),
                zone_count: 1 + rng.gen_range(0..2),
                agent1_units: agent_units[0],
                agent2_units: agent_units[1],
                agent3_units: agent_units[2],
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!(
        "Wrote {} synthetic submissions for {} teams over {} days to {:?}",
        rows,
        team_codes.len(),
        args.days,
        args.output
    );
    Ok(())
}
