use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::roster;

/// Raw record from the semicolon-delimited form export.
/// `NumZD` stays text: values carry leading zeros and may be a
/// comma-separated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRecord {
    #[serde(rename = "nom_CE")]
    pub team_code: String,
    #[serde(rename = "date_reporting")]
    pub report_date: String,
    #[serde(rename = "NomReg")]
    pub region: String,
    #[serde(rename = "NomDep")]
    pub department: String,
    #[serde(rename = "NomSp")]
    pub sub_prefecture: String,
    #[serde(rename = "NumZD")]
    pub zone_ids: Option<String>,
    #[serde(rename = "UEF_total")]
    pub formal_units: u32,
    #[serde(rename = "UEI_total")]
    pub informal_units: u32,
    #[serde(rename = "UE_total")]
    pub total_units: u32,
    #[serde(rename = "refus_total")]
    pub refusals: u32,
    #[serde(rename = "partiel_total")]
    pub partials: u32,
    #[serde(rename = "NbZD")]
    pub zone_count: u32,
    #[serde(rename = "UE_enq1")]
    pub agent1_units: u32,
    #[serde(rename = "UE_enq2")]
    pub agent2_units: u32,
    #[serde(rename = "UE_enq3")]
    pub agent3_units: u32,
}

/// One form submission with roster names attached and the date parsed.
/// Immutable once loaded; the table is rebuilt wholesale on refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub team_code: String,
    pub team_leader: Option<String>,
    pub supervisor: Option<String>,
    pub report_date: NaiveDate,
    pub region: String,
    pub department: String,
    pub sub_prefecture: String,
    pub zone_ids: Option<String>,
    pub formal_units: u32,
    pub informal_units: u32,
    pub total_units: u32,
    pub refusals: u32,
    pub partials: u32,
    pub zone_count: u32,
    /// Per-enumerator unit counts, one slot per agent on the team.
    pub agent_units: [u32; 3],
}

/// Upstream exports dates as day/month/year; ISO dates are accepted as
/// a fallback for locally generated files.
fn parse_report_date(raw: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|e| ReportError::DataUnavailable(format!("bad report date {raw:?}: {e}")))
}

impl CsvRecord {
    pub fn to_submission(&self) -> Result<Submission, ReportError> {
        let report_date = parse_report_date(&self.report_date)?;
        let identity = roster::resolve_team(&self.team_code);

        // Treat an empty zone field like a missing one.
        let zone_ids = self
            .zone_ids
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .map(str::to_string);

        Ok(Submission {
            team_code: self.team_code.clone(),
            team_leader: identity.as_ref().map(|t| t.leader.clone()),
            supervisor: identity.map(|t| t.supervisor),
            report_date,
            region: self.region.clone(),
            department: self.department.clone(),
            sub_prefecture: self.sub_prefecture.clone(),
            zone_ids,
            formal_units: self.formal_units,
            informal_units: self.informal_units,
            total_units: self.total_units,
            refusals: self.refusals,
            partials: self.partials,
            zone_count: self.zone_count,
            agent_units: [self.agent1_units, self.agent2_units, self.agent3_units],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> CsvRecord {
        CsvRecord {
            team_code: "RGEECI_Ce0131".to_string(),
            report_date: date.to_string(),
            region: "GBEKE".to_string(),
            department: "BOUAKE".to_string(),
            sub_prefecture: "BOUAKE".to_string(),
            zone_ids: Some("0012,0013".to_string()),
            formal_units: 3,
            informal_units: 2,
            total_units: 5,
            refusals: 0,
            partials: 1,
            zone_count: 2,
            agent1_units: 2,
            agent2_units: 2,
            agent3_units: 1,
        }
    }

    #[test]
    fn test_roster_names_attached() {
        let sub = record("15/01/2024").to_submission().unwrap();
        assert_eq!(sub.team_leader.as_deref(), Some("KOFFI BALEY YVES VINCENT"));
        assert_eq!(sub.supervisor.as_deref(), Some("KOFFI"));
        assert_eq!(sub.report_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_iso_date_fallback() {
        let sub = record("2024-01-15").to_submission().unwrap();
        assert_eq!(sub.report_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_bad_date_is_data_unavailable() {
        let err = record("January 15").to_submission().unwrap_err();
        assert!(matches!(err, ReportError::DataUnavailable(_)));
    }

    #[test]
    fn test_unknown_team_keeps_blank_names() {
        let mut rec = record("15/01/2024");
        rec.team_code = "RGEECI_Ce9999".to_string();
        let sub = rec.to_submission().unwrap();
        assert!(sub.team_leader.is_none());
        assert!(sub.supervisor.is_none());
    }

    #[test]
    fn test_empty_zone_field_is_none() {
        let mut rec = record("15/01/2024");
        rec.zone_ids = Some("  ".to_string());
        assert!(rec.to_submission().unwrap().zone_ids.is_none());
    }
}
