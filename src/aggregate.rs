//! Aggregation pipeline
//!
//! Pure derivations over the filtered submission table. Each function
//! takes the rows as sole input and produces one of the tables or
//! scalar blocks the dashboard shows. Group keys come out in ascending
//! order; the team pivot then re-sorts its data rows descending by the
//! Ensemble column with a stable sort.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Submission;
use crate::roster;

/// Zone field value meaning "no zone assigned"; never counted as
/// coverage.
pub const ZONE_SENTINEL: &str = "0000";

/// Unique enumeration zones seen across the filtered rows.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneCoverage {
    pub zones: BTreeSet<String>,
}

impl ZoneCoverage {
    pub fn count(&self) -> usize {
        self.zones.len()
    }

    /// Share of the national zone total covered so far, in percent.
    pub fn realization_rate(&self, national_total: u64) -> f64 {
        if national_total == 0 {
            return 0.0;
        }
        self.zones.len() as f64 / national_total as f64 * 100.0
    }
}

/// Split each row's zone field on `,`, flatten, dedupe, drop the
/// sentinel. Rows without a zone field contribute nothing.
pub fn zone_coverage(rows: &[Submission]) -> ZoneCoverage {
    let mut zones = BTreeSet::new();
    for row in rows {
        if let Some(field) = &row.zone_ids {
            for zone in field.split(',') {
                let zone = zone.trim();
                if !zone.is_empty() {
                    zones.insert(zone.to_string());
                }
            }
        }
    }
    zones.remove(ZONE_SENTINEL);
    ZoneCoverage { zones }
}

/// Headline scalar KPIs. All counters are all-time sums over the
/// filtered rows except `partials_today`, which only counts rows dated
/// `today` (the dashboard shows what changed today, not a running
/// total).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Kpis {
    pub total_units: u64,
    pub formal_units: u64,
    pub informal_units: u64,
    pub refusals: u64,
    pub partials_today: u64,
}

pub fn scalar_kpis(rows: &[Submission], today: NaiveDate) -> Kpis {
    let mut kpis = Kpis::default();
    for row in rows {
        kpis.total_units += u64::from(row.total_units);
        kpis.formal_units += u64::from(row.formal_units);
        kpis.informal_units += u64::from(row.informal_units);
        kpis.refusals += u64::from(row.refusals);
        if row.report_date == today {
            kpis.partials_today += u64::from(row.partials);
        }
    }
    kpis
}

/// Blank label for rows whose team code has no roster entry.
fn leader_label(row: &Submission) -> String {
    row.team_leader.clone().unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotRow {
    pub label: String,
    /// One cell per date column, zero-filled for missing combinations.
    pub cells: Vec<u64>,
    /// Row-wise sum ("Ensemble").
    pub ensemble: u64,
}

/// Team leader × report date cross-tabulation of total units.
#[derive(Debug, Clone, Serialize)]
pub struct PivotTable {
    pub dates: Vec<NaiveDate>,
    /// Data rows, sorted descending by `ensemble` (stable, so ties keep
    /// their ascending-label order).
    pub rows: Vec<PivotRow>,
    /// Column-wise sum row, always last and excluded from the sort.
    pub total: PivotRow,
}

pub fn team_date_pivot(rows: &[Submission]) -> PivotTable {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut teams: BTreeMap<String, BTreeMap<NaiveDate, u64>> = BTreeMap::new();

    for row in rows {
        dates.insert(row.report_date);
        *teams
            .entry(leader_label(row))
            .or_default()
            .entry(row.report_date)
            .or_default() += u64::from(row.total_units);
    }

    let dates: Vec<NaiveDate> = dates.into_iter().collect();
    let mut pivot_rows: Vec<PivotRow> = teams
        .into_iter()
        .map(|(label, by_date)| {
            let cells: Vec<u64> = dates
                .iter()
                .map(|d| by_date.get(d).copied().unwrap_or(0))
                .collect();
            let ensemble = cells.iter().sum();
            PivotRow {
                label,
                cells,
                ensemble,
            }
        })
        .collect();

    // Vec::sort_by is stable; ties keep the ascending label order.
    pivot_rows.sort_by(|a, b| b.ensemble.cmp(&a.ensemble));

    let total_cells: Vec<u64> = (0..dates.len())
        .map(|i| pivot_rows.iter().map(|r| r.cells[i]).sum())
        .collect();
    let total = PivotRow {
        label: "Total".to_string(),
        ensemble: total_cells.iter().sum(),
        cells: total_cells,
    };

    PivotTable {
        dates,
        rows: pivot_rows,
        total,
    }
}

/// Grouping key for the rollup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Department,
    Supervisor,
    TeamLeader,
}

impl GroupBy {
    fn label(self, row: &Submission) -> String {
        match self {
            GroupBy::Department => row.department.clone(),
            GroupBy::Supervisor => row.supervisor.clone().unwrap_or_default(),
            GroupBy::TeamLeader => leader_label(row),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RollupRow {
    pub label: String,
    pub formal_units: u64,
    pub informal_units: u64,
    pub total_units: u64,
    pub refusals: u64,
    pub zone_count: u64,
}

impl RollupRow {
    fn absorb(&mut self, row: &Submission) {
        self.formal_units += u64::from(row.formal_units);
        self.informal_units += u64::from(row.informal_units);
        self.total_units += u64::from(row.total_units);
        self.refusals += u64::from(row.refusals);
        self.zone_count += u64::from(row.zone_count);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RollupTable {
    pub rows: Vec<RollupRow>,
    /// Synthetic sum row; only the department rollup carries one.
    pub total: Option<RollupRow>,
}

pub fn rollup(rows: &[Submission], group_by: GroupBy) -> RollupTable {
    let mut groups: BTreeMap<String, RollupRow> = BTreeMap::new();
    for row in rows {
        let label = group_by.label(row);
        groups
            .entry(label.clone())
            .or_insert_with(|| RollupRow {
                label,
                ..Default::default()
            })
            .absorb(row);
    }
    let rows: Vec<RollupRow> = groups.into_values().collect();

    let total = (group_by == GroupBy::Department).then(|| {
        let mut total = RollupRow {
            label: "Total".to_string(),
            ..Default::default()
        };
        for row in &rows {
            total.formal_units += row.formal_units;
            total.informal_units += row.informal_units;
            total.total_units += row.total_units;
            total.refusals += row.refusals;
            total.zone_count += row.zone_count;
        }
        total
    });

    RollupTable { rows, total }
}

/// One line of the melted per-agent table: the team's three wide agent
/// columns become one row per (team, slot).
#[derive(Debug, Clone, Serialize)]
pub struct AgentRow {
    pub team_code: String,
    pub slot: u8,
    pub agent_name: Option<String>,
    pub total_units: u64,
}

/// All-time per-agent totals, sorted descending by count (stable).
/// Every team present in the rows yields exactly three entries.
pub fn agent_totals(rows: &[Submission]) -> Vec<AgentRow> {
    let mut teams: BTreeMap<String, [u64; 3]> = BTreeMap::new();
    for row in rows {
        let sums = teams.entry(row.team_code.clone()).or_default();
        for (slot, units) in row.agent_units.iter().enumerate() {
            sums[slot] += u64::from(*units);
        }
    }

    let mut melted: Vec<AgentRow> = teams
        .into_iter()
        .flat_map(|(team_code, sums)| {
            (0..3u8).map(move |i| AgentRow {
                slot: i + 1,
                agent_name: roster::resolve_agent(&team_code, i + 1),
                total_units: sums[i as usize],
                team_code: team_code.clone(),
            })
        })
        .collect();
    melted.sort_by(|a, b| b.total_units.cmp(&a.total_units));
    melted
}

/// Per-agent daily trend row.
#[derive(Debug, Clone, Serialize)]
pub struct AgentDailyRow {
    pub report_date: NaiveDate,
    pub team_code: String,
    pub slot: u8,
    pub agent_name: Option<String>,
    pub total_units: u64,
}

/// Same reshape as `agent_totals` but grouped by report date first,
/// for the per-agent trend chart. Ordered by date, then team, then
/// slot.
pub fn agent_daily_series(rows: &[Submission]) -> Vec<AgentDailyRow> {
    let mut groups: BTreeMap<(NaiveDate, String), [u64; 3]> = BTreeMap::new();
    for row in rows {
        let sums = groups
            .entry((row.report_date, row.team_code.clone()))
            .or_default();
        for (slot, units) in row.agent_units.iter().enumerate() {
            sums[slot] += u64::from(*units);
        }
    }

    groups
        .into_iter()
        .flat_map(|((report_date, team_code), sums)| {
            (0..3u8).map(move |i| AgentDailyRow {
                report_date,
                slot: i + 1,
                agent_name: roster::resolve_agent(&team_code, i + 1),
                total_units: sums[i as usize],
                team_code: team_code.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(team_code: &str, day: &str, zones: Option<&str>) -> Submission {
        let identity = roster::resolve_team(team_code);
        Submission {
            team_code: team_code.to_string(),
            team_leader: identity.as_ref().map(|t| t.leader.clone()),
            supervisor: identity.map(|t| t.supervisor),
            report_date: date(day),
            region: "GBEKE".to_string(),
            department: "BOUAKE".to_string(),
            sub_prefecture: "BOUAKE".to_string(),
            zone_ids: zones.map(str::to_string),
            formal_units: 3,
            informal_units: 2,
            total_units: 5,
            refusals: 1,
            partials: 1,
            zone_count: 2,
            agent_units: [2, 2, 1],
        }
    }

    #[test]
    fn test_zone_coverage_drops_sentinel_and_duplicates() {
        let rows = vec![
            row("RGEECI_Ce0131", "2024-01-01", Some("0012,0013")),
            row("RGEECI_Ce0131", "2024-01-02", Some("0000")),
            row("RGEECI_Ce0132", "2024-01-02", Some("0013")),
            row("RGEECI_Ce0132", "2024-01-03", None),
        ];
        let coverage = zone_coverage(&rows);
        assert_eq!(coverage.count(), 2);
        assert!(coverage.zones.contains("0012"));
        assert!(coverage.zones.contains("0013"));
    }

    #[test]
    fn test_realization_rate() {
        let rows = vec![row("RGEECI_Ce0131", "2024-01-01", Some("0012,0013"))];
        let coverage = zone_coverage(&rows);
        let rate = coverage.realization_rate(569);
        assert!((rate - 2.0 / 569.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_partials_count_today_only() {
        let rows = vec![
            row("RGEECI_Ce0131", "2024-01-01", None),
            row("RGEECI_Ce0131", "2024-01-02", None),
        ];
        let kpis = scalar_kpis(&rows, date("2024-01-02"));
        assert_eq!(kpis.total_units, 10);
        assert_eq!(kpis.partials_today, 1);

        let kpis = scalar_kpis(&rows, date("2024-01-03"));
        assert_eq!(kpis.partials_today, 0);
    }

    #[test]
    fn test_empty_table_yields_zero_kpis() {
        let kpis = scalar_kpis(&[], date("2024-01-01"));
        assert_eq!(kpis.total_units, 0);
        assert_eq!(zone_coverage(&[]).count(), 0);
        let pivot = team_date_pivot(&[]);
        assert!(pivot.rows.is_empty());
        assert_eq!(pivot.total.ensemble, 0);
        assert!(rollup(&[], GroupBy::Supervisor).rows.is_empty());
        assert!(agent_totals(&[]).is_empty());
    }

    #[test]
    fn test_pivot_zero_fills_and_sums() {
        let rows = vec![
            row("RGEECI_Ce0131", "2024-01-01", None),
            row("RGEECI_Ce0131", "2024-01-02", None),
            row("RGEECI_Ce0132", "2024-01-02", None),
        ];
        let pivot = team_date_pivot(&rows);
        assert_eq!(pivot.dates.len(), 2);
        assert_eq!(pivot.rows.len(), 2);

        // Ce0131 leads with 10, Ce0132 has a zero-filled first cell.
        assert_eq!(pivot.rows[0].label, "KOFFI BALEY YVES VINCENT");
        assert_eq!(pivot.rows[0].cells, vec![5, 5]);
        assert_eq!(pivot.rows[0].ensemble, 10);
        assert_eq!(pivot.rows[1].cells, vec![0, 5]);

        // Ensemble equals the row sum; Total cells equal column sums.
        for data_row in &pivot.rows {
            assert_eq!(data_row.ensemble, data_row.cells.iter().sum::<u64>());
        }
        assert_eq!(pivot.total.cells, vec![5, 10]);
        assert_eq!(pivot.total.ensemble, 15);
    }

    #[test]
    fn test_pivot_sort_is_stable_on_ties() {
        let rows = vec![
            row("RGEECI_Ce0132", "2024-01-01", None),
            row("RGEECI_Ce0131", "2024-01-01", None),
        ];
        let pivot = team_date_pivot(&rows);
        // Equal ensembles keep the ascending-label grouping order.
        assert_eq!(pivot.rows[0].label, "KOFFI BALEY YVES VINCENT");
        assert_eq!(pivot.rows[1].label, "SOUMAHORO MONMIGNAN");
    }

    #[test]
    fn test_rollup_conservation() {
        let rows = vec![
            row("RGEECI_Ce0131", "2024-01-01", None),
            row("RGEECI_Ce0132", "2024-01-02", None),
            row("RGEECI_Ce0134", "2024-01-02", None),
        ];
        let direct = scalar_kpis(&rows, date("2024-01-01")).total_units;
        for group_by in [GroupBy::Department, GroupBy::Supervisor, GroupBy::TeamLeader] {
            let table = rollup(&rows, group_by);
            let grouped: u64 = table.rows.iter().map(|r| r.total_units).sum();
            assert_eq!(grouped, direct);
        }
    }

    #[test]
    fn test_only_department_rollup_has_total_row() {
        let rows = vec![row("RGEECI_Ce0131", "2024-01-01", None)];
        assert!(rollup(&rows, GroupBy::Department).total.is_some());
        assert!(rollup(&rows, GroupBy::Supervisor).total.is_none());
        assert!(rollup(&rows, GroupBy::TeamLeader).total.is_none());

        let dept = rollup(&rows, GroupBy::Department);
        let total = dept.total.unwrap();
        assert_eq!(total.total_units, 5);
        assert_eq!(total.zone_count, 2);
    }

    #[test]
    fn test_unresolved_team_groups_under_blank_label() {
        let mut unknown = row("RGEECI_Ce0131", "2024-01-01", None);
        unknown.team_code = "RGEECI_Ce9999".to_string();
        unknown.team_leader = None;
        unknown.supervisor = None;
        let table = rollup(&[unknown], GroupBy::TeamLeader);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].label, "");
    }

    #[test]
    fn test_agent_reshape_completeness() {
        let rows = vec![
            row("RGEECI_Ce0131", "2024-01-01", None),
            row("RGEECI_Ce0131", "2024-01-02", None),
            row("RGEECI_Ce0132", "2024-01-01", None),
        ];
        let melted = agent_totals(&rows);
        // Two teams, three slots each.
        assert_eq!(melted.len(), 6);

        let wide_sum: u64 = rows
            .iter()
            .flat_map(|r| r.agent_units.iter())
            .map(|u| u64::from(*u))
            .sum();
        let long_sum: u64 = melted.iter().map(|r| r.total_units).sum();
        assert_eq!(long_sum, wide_sum);

        // Sorted descending by count.
        assert!(melted.windows(2).all(|w| w[0].total_units >= w[1].total_units));
        // Names resolve through the slot-suffixed roster key.
        let top = melted.iter().find(|r| r.team_code == "RGEECI_Ce0131" && r.slot == 1);
        assert_eq!(
            top.unwrap().agent_name.as_deref(),
            Some("N'GUESSAN AKISSI PAULINE")
        );
    }

    #[test]
    fn test_agent_daily_series_groups_by_date_first() {
        let rows = vec![
            row("RGEECI_Ce0131", "2024-01-02", None),
            row("RGEECI_Ce0131", "2024-01-01", None),
        ];
        let series = agent_daily_series(&rows);
        assert_eq!(series.len(), 6);
        assert_eq!(series[0].report_date, date("2024-01-01"));
        assert_eq!(series[3].report_date, date("2024-01-02"));
        // Within a day the three slots stay in order.
        assert_eq!(series[0].slot, 1);
        assert_eq!(series[2].slot, 3);
    }
}
