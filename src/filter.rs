//! Filter stage
//!
//! Conjunctive equality predicates over the submission table. The
//! stage is fail-open: if any clause cannot be applied the whole pass
//! falls back to the unfiltered table rather than failing the render.

use serde::Deserialize;
use tracing::warn;

use crate::error::ReportError;
use crate::models::Submission;

/// One equality predicate, column by name. Keeping the column a string
/// means a stale reference shows up as a recoverable error instead of
/// a compile-time certainty, matching the dashboard's contract.
#[derive(Debug, Clone)]
pub struct FilterClause {
    pub column: String,
    pub value: String,
}

impl FilterClause {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Sidebar selections. `None` or an empty string means no restriction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterSelection {
    pub supervisor: Option<String>,
    pub team_leader: Option<String>,
    pub region: Option<String>,
    pub department: Option<String>,
    pub sub_prefecture: Option<String>,
}

impl FilterSelection {
    pub fn clauses(&self) -> Vec<FilterClause> {
        [
            ("supervisor", &self.supervisor),
            ("team_leader", &self.team_leader),
            ("region", &self.region),
            ("department", &self.department),
            ("sub_prefecture", &self.sub_prefecture),
        ]
        .into_iter()
        .filter_map(|(column, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some(FilterClause::new(column, v)),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }
}

fn field_value<'a>(row: &'a Submission, column: &str) -> Result<Option<&'a str>, ReportError> {
    match column {
        "supervisor" => Ok(row.supervisor.as_deref()),
        "team_leader" => Ok(row.team_leader.as_deref()),
        "region" => Ok(Some(row.region.as_str())),
        "department" => Ok(Some(row.department.as_str())),
        "sub_prefecture" => Ok(Some(row.sub_prefecture.as_str())),
        _ => Err(ReportError::UnknownFilterColumn(column.to_string())),
    }
}

fn is_known_column(column: &str) -> bool {
    matches!(
        column,
        "supervisor" | "team_leader" | "region" | "department" | "sub_prefecture"
    )
}

fn try_apply(rows: &[Submission], clauses: &[FilterClause]) -> Result<Vec<Submission>, ReportError> {
    // Validate every clause before filtering so a bad clause cannot
    // leave a half-filtered result behind.
    for clause in clauses {
        if !is_known_column(&clause.column) {
            return Err(ReportError::UnknownFilterColumn(clause.column.clone()));
        }
    }

    let mut kept: Vec<Submission> = rows.to_vec();
    for clause in clauses {
        kept.retain(|row| {
            matches!(field_value(row, &clause.column), Ok(Some(v)) if v == clause.value)
        });
    }
    Ok(kept)
}

/// Apply filter clauses conjunctively. On any failure the table is
/// returned unfiltered for this pass (fail-open), with a warning.
pub fn apply(rows: &[Submission], clauses: &[FilterClause]) -> Vec<Submission> {
    match try_apply(rows, clauses) {
        Ok(filtered) => filtered,
        Err(e) => {
            warn!("Filter pass failed, showing unfiltered data: {}", e);
            rows.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(team_code: &str, supervisor: &str, department: &str) -> Submission {
        Submission {
            team_code: team_code.to_string(),
            team_leader: Some(format!("CE {team_code}")),
            supervisor: Some(supervisor.to_string()),
            report_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            region: "GBEKE".to_string(),
            department: department.to_string(),
            sub_prefecture: department.to_string(),
            zone_ids: None,
            formal_units: 1,
            informal_units: 1,
            total_units: 2,
            refusals: 0,
            partials: 0,
            zone_count: 1,
            agent_units: [1, 1, 0],
        }
    }

    fn table() -> Vec<Submission> {
        vec![
            row("T1", "KOFFI", "BOUAKE"),
            row("T2", "KOFFI", "BEOUMI"),
            row("T3", "KOUADIO", "BOUAKE"),
        ]
    }

    #[test]
    fn test_conjunctive_filters() {
        let clauses = vec![
            FilterClause::new("supervisor", "KOFFI"),
            FilterClause::new("department", "BOUAKE"),
        ];
        let filtered = apply(&table(), &clauses);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].team_code, "T1");
    }

    #[test]
    fn test_filter_order_is_irrelevant() {
        let ab = vec![
            FilterClause::new("supervisor", "KOFFI"),
            FilterClause::new("department", "BOUAKE"),
        ];
        let ba: Vec<FilterClause> = ab.iter().rev().cloned().collect();
        let rows = table();
        let left: Vec<String> = apply(&rows, &ab).iter().map(|r| r.team_code.clone()).collect();
        let right: Vec<String> = apply(&rows, &ba).iter().map(|r| r.team_code.clone()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_unmatched_value_is_empty_not_error() {
        let clauses = vec![FilterClause::new("region", "DENGUELE")];
        assert!(apply(&table(), &clauses).is_empty());
    }

    #[test]
    fn test_unknown_column_fails_open() {
        let rows = table();
        let clauses = vec![
            FilterClause::new("supervisor", "KOFFI"),
            FilterClause::new("zone", "0012"),
        ];
        let filtered = apply(&rows, &clauses);
        // The whole pass falls back; the valid clause is not applied
        // either.
        assert_eq!(filtered.len(), rows.len());
    }

    #[test]
    fn test_unknown_column_fails_open_on_empty_table() {
        let clauses = vec![FilterClause::new("zone", "0012")];
        assert!(apply(&[], &clauses).is_empty());
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let selection = FilterSelection {
            supervisor: Some(String::new()),
            ..Default::default()
        };
        assert!(selection.is_empty());
        assert_eq!(apply(&table(), &selection.clauses()).len(), 3);
    }
}
