//! One render pass's worth of dashboard outputs
//!
//! Bundles every derivation the presentation side consumes: the CLI
//! prints these as tables, the API serializes them as JSON.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::aggregate::{
    self, AgentDailyRow, AgentRow, GroupBy, Kpis, PivotTable, RollupTable, ZoneCoverage,
};
use crate::models::Submission;

/// Total number of enumeration zones nationwide. Fixed planning figure
/// used as the denominator of the realization-rate KPI, not derived
/// from data.
pub const NATIONAL_ZONE_COUNT: u64 = 569;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub kpis: Kpis,
    pub zone_coverage: ZoneCoverage,
    pub zone_realization_pct: f64,
    pub team_pivot: PivotTable,
    pub by_department: RollupTable,
    pub by_supervisor: RollupTable,
    pub by_team_leader: RollupTable,
    pub agent_totals: Vec<AgentRow>,
    pub agent_daily: Vec<AgentDailyRow>,
}

/// Run every derivation over the filtered rows. `today` anchors the
/// partials KPI, which only counts the current reporting day.
pub fn build_report(rows: &[Submission], today: NaiveDate) -> DashboardReport {
    let zone_coverage = aggregate::zone_coverage(rows);
    let zone_realization_pct = zone_coverage.realization_rate(NATIONAL_ZONE_COUNT);
    DashboardReport {
        kpis: aggregate::scalar_kpis(rows, today),
        zone_realization_pct,
        zone_coverage,
        team_pivot: aggregate::team_date_pivot(rows),
        by_department: aggregate::rollup(rows, GroupBy::Department),
        by_supervisor: aggregate::rollup(rows, GroupBy::Supervisor),
        by_team_leader: aggregate::rollup(rows, GroupBy::TeamLeader),
        agent_totals: aggregate::agent_totals(rows),
        agent_daily: aggregate::agent_daily_series(rows),
    }
}

/// `build_report` anchored on the local calendar date.
pub fn build_report_today(rows: &[Submission]) -> DashboardReport {
    build_report(rows, Local::now().date_naive())
}
