//! REST API server for the collection reporting dashboard
//!
//! Usage:
//!   ./target/release/api_server [OPTIONS]
//!
//! Endpoints:
//!   GET  /api/v1/health          - Health check
//!   GET  /api/v1/report          - Full render pass (all tables)
//!   GET  /api/v1/kpis            - Scalar KPIs + zone coverage
//!   GET  /api/v1/pivot/teams     - Team leader x date pivot
//!   GET  /api/v1/rollup/:group   - department | supervisor | team-leader
//!   GET  /api/v1/agents          - Per-agent totals (long form)
//!   GET  /api/v1/agents/daily    - Per-agent daily trend
//!   POST /api/v1/refresh         - Invalidate the export cache
//!
//! All GET endpoints accept filter query parameters:
//!   ?supervisor=&team_leader=&region=&department=&sub_prefecture=

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rgeeci_reporting::api::{handlers, ReportingService};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "Serve the collection reporting aggregates over REST")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Export URL of the form-aggregation service
    #[arg(
        long,
        default_value = "https://kf.kobotoolbox.org/api/v2/assets/aQTxCNZFyJ9avyyfDbXEz6/export-settings/esU2z5gz8LUBsmsbgJWjtug/data.csv"
    )]
    source: String,
}

fn print_banner(port: u16, source: &str) {
    println!("============================================================");
    println!("         RGEE-CI COLLECTION REPORTING API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:    {}", port);
    println!("  Source:  {}", source);
    println!();
    println!("Endpoints:");
    println!("  GET  /api/v1/health          Health check");
    println!("  GET  /api/v1/report          Full report");
    println!("  GET  /api/v1/kpis            Scalar KPIs");
    println!("  GET  /api/v1/pivot/teams     Team x date pivot");
    println!("  GET  /api/v1/rollup/:group   Grouped rollups");
    println!("  GET  /api/v1/agents          Per-agent totals");
    println!("  GET  /api/v1/agents/daily    Per-agent trend");
    println!("  POST /api/v1/refresh         Invalidate cache");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    print_banner(args.port, &args.source);

    let service = Arc::new(ReportingService::new(args.source));
    let app = create_router(service);

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(service: Arc<ReportingService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/report", get(handlers::get_report))
        .route("/api/v1/kpis", get(handlers::get_kpis))
        .route("/api/v1/pivot/teams", get(handlers::get_team_pivot))
        .route("/api/v1/rollup/:group", get(handlers::get_rollup))
        .route("/api/v1/agents", get(handlers::get_agents))
        .route("/api/v1/agents/daily", get(handlers::get_agent_daily))
        .route("/api/v1/refresh", post(handlers::post_refresh))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
