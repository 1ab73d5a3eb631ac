//! RGEE-CI collection reporting dashboard (terminal view)
//!
//! Fetches the form export, applies the sidebar filters and prints the
//! KPI blocks and monitoring tables.
//!
//! Run: ./target/release/rgeeci_reporting [OPTIONS]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use rgeeci_reporting::filter::{self, FilterSelection};
use rgeeci_reporting::loader::{read_export_file, DataSource};
use rgeeci_reporting::report::{build_report_today, DashboardReport, NATIONAL_ZONE_COUNT};

/// Collection monitoring dashboard for the RGEE-CI field operation
#[derive(Parser, Debug)]
#[command(name = "rgeeci_reporting")]
#[command(about = "Print collection KPIs and monitoring tables")]
struct Args {
    /// Export URL of the form-aggregation service
    #[arg(
        long,
        default_value = "https://kf.kobotoolbox.org/api/v2/assets/aQTxCNZFyJ9avyyfDbXEz6/export-settings/esU2z5gz8LUBsmsbgJWjtug/data.csv"
    )]
    source: String,

    /// Read a local export file instead of fetching the URL
    #[arg(long)]
    input: Option<PathBuf>,

    /// Restrict to one supervisor
    #[arg(long)]
    supervisor: Option<String>,

    /// Restrict to one team leader
    #[arg(long)]
    team_leader: Option<String>,

    /// Restrict to one region
    #[arg(long)]
    region: Option<String>,

    /// Restrict to one department
    #[arg(long)]
    department: Option<String>,

    /// Restrict to one sub-prefecture
    #[arg(long)]
    sub_prefecture: Option<String>,
}

fn print_section_header(title: &str) {
    println!("\n{}", "═".repeat(80));
    println!("  {}", title);
    println!("{}\n", "═".repeat(80));
}

fn print_report(report: &DashboardReport) {
    print_section_header("KPI COLLECTE");
    println!("  UE:                   {:>12}", report.kpis.total_units);
    println!("  UE formelle:          {:>12}", report.kpis.formal_units);
    println!("  UE informelle:        {:>12}", report.kpis.informal_units);
    println!("  Refus:                {:>12}", report.kpis.refusals);
    println!("  Partiels (jour):      {:>12}", report.kpis.partials_today);
    println!("  ZDs traités:          {:>12}", report.zone_coverage.count());
    println!(
        "  Taux de réalisation:  {:>11.2}% (sur {} ZD)",
        report.zone_realization_pct, NATIONAL_ZONE_COUNT
    );

    print_section_header("SUIVI PAR EQUIPE (UE par jour)");
    print!("  {:32}", "Chef d'équipe");
    for date in &report.team_pivot.dates {
        print!(" {:>10}", date.format("%d/%m"));
    }
    println!(" {:>10}", "Ensemble");
    println!("  {}", "─".repeat(44 + 11 * report.team_pivot.dates.len()));
    for row in report.team_pivot.rows.iter().chain([&report.team_pivot.total]) {
        print!("  {:32}", row.label);
        for cell in &row.cells {
            print!(" {:>10}", cell);
        }
        println!(" {:>10}", row.ensemble);
    }

    for (title, table) in [
        ("SUIVI PAR DEPARTEMENT", &report.by_department),
        ("SUIVI PAR SUPERVISEUR", &report.by_supervisor),
        ("SUIVI PAR CHEF D'EQUIPE", &report.by_team_leader),
    ] {
        print_section_header(title);
        println!(
            "  {:32} {:>10} {:>12} {:>10} {:>8} {:>10}",
            "", "UE form.", "UE inform.", "UE total", "Refus", "Nb ZD"
        );
        println!("  {}", "─".repeat(88));
        for row in table.rows.iter().chain(table.total.iter()) {
            println!(
                "  {:32} {:>10} {:>12} {:>10} {:>8} {:>10}",
                row.label,
                row.formal_units,
                row.informal_units,
                row.total_units,
                row.refusals,
                row.zone_count
            );
        }
    }

    print_section_header("SUIVI PAR AGENT ENQUETEUR");
    println!(
        "  {:32} {:16} {:>6} {:>10}",
        "Agent", "Equipe", "Poste", "UE total"
    );
    println!("  {}", "─".repeat(68));
    for row in &report.agent_totals {
        println!(
            "  {:32} {:16} {:>6} {:>10}",
            row.agent_name.as_deref().unwrap_or(""),
            row.team_code,
            row.slot,
            row.total_units
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();

    let table = match &args.input {
        Some(path) => read_export_file(path)?,
        None => {
            let source = DataSource::new(args.source.clone());
            source.load().await?.as_ref().clone()
        }
    };

    let selection = FilterSelection {
        supervisor: args.supervisor,
        team_leader: args.team_leader,
        region: args.region,
        department: args.department,
        sub_prefecture: args.sub_prefecture,
    };
    let rows = filter::apply(&table, &selection.clauses());
    info!(
        "{} submissions after filtering ({} loaded)",
        rows.len(),
        table.len()
    );

    let report = build_report_today(&rows);
    print_report(&report);

    Ok(())
}
