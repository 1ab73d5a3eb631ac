//! Static field roster for the collection operation
//! Maps team codes to team leaders, supervisors and enumerators

use std::collections::HashMap;
use std::sync::LazyLock;

/// Team code -> team leader (chef d'équipe) name
pub static TEAM_LEADERS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("RGEECI_Ce0131", "KOFFI BALEY YVES VINCENT");
    m.insert("RGEECI_Ce0132", "SOUMAHORO MONMIGNAN");
    m.insert("RGEECI_Ce0133", "GONGBE KOUADIO AUBAIN");
    m.insert("RGEECI_Ce0134", "YEO ZIE SAMUEL");
    m.insert("RGEECI_Ce0135", "DANGBE YOLÉ SYLVIE CARINE");
    m.insert("RGEECI_Ce0136", "BAGATE KARIM");

    m
});

/// Team code -> supervisor name
pub static SUPERVISORS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("RGEECI_Ce0131", "KOFFI");
    m.insert("RGEECI_Ce0132", "KOFFI");
    m.insert("RGEECI_Ce0133", "KOFFI");
    m.insert("RGEECI_Ce0134", "KOUADIO");
    m.insert("RGEECI_Ce0135", "KOUADIO");
    m.insert("RGEECI_Ce0136", "KOUADIO");

    m
});

/// Team code + agent slot digit -> enumerator name
pub static AGENTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("RGEECI_Ce01311", "N'GUESSAN AKISSI PAULINE");
    m.insert("RGEECI_Ce01312", "OUATTARA SALIMATA");
    m.insert("RGEECI_Ce01313", "KONAN KOUAKOU ERIC");
    m.insert("RGEECI_Ce01321", "TRAORE ADAMA");
    m.insert("RGEECI_Ce01322", "KOUAME AFFOUE ESTELLE");
    m.insert("RGEECI_Ce01323", "DIABATE MAMADOU");
    m.insert("RGEECI_Ce01331", "ASSI N'DRI JONAS");
    m.insert("RGEECI_Ce01332", "COULIBALY FATOUMATA");
    m.insert("RGEECI_Ce01333", "YAO KOFFI BERTIN");
    m.insert("RGEECI_Ce01341", "SILUE KATIENEN");
    m.insert("RGEECI_Ce01342", "KONE MARIAM");
    m.insert("RGEECI_Ce01343", "GBANE SOULEYMANE");
    m.insert("RGEECI_Ce01351", "AKA ADJOUA CLARISSE");
    m.insert("RGEECI_Ce01352", "TANOH AMANI FRANCK");
    m.insert("RGEECI_Ce01353", "DOUMBIA AWA");
    m.insert("RGEECI_Ce01361", "BAMBA ISSOUF");
    m.insert("RGEECI_Ce01362", "EHOUMAN ABENAN LYDIE");
    m.insert("RGEECI_Ce01363", "ZADI GNAHORE SERGE");

    m
});

/// Resolved team identity for display
#[derive(Debug, Clone, PartialEq)]
pub struct TeamIdentity {
    pub leader: String,
    pub supervisor: String,
}

/// Look up the team leader and supervisor for a team code.
/// Unknown codes resolve to `None`; the caller displays a blank.
pub fn resolve_team(team_code: &str) -> Option<TeamIdentity> {
    let leader = TEAM_LEADERS.get(team_code)?;
    let supervisor = SUPERVISORS.get(team_code)?;
    Some(TeamIdentity {
        leader: leader.to_string(),
        supervisor: supervisor.to_string(),
    })
}

/// Look up an enumerator by team code and agent slot (1..=3).
/// The lookup key is the team code with the slot digit appended.
pub fn resolve_agent(team_code: &str, slot: u8) -> Option<String> {
    let key = format!("{}{}", team_code, slot);
    AGENTS.get(key.as_str()).map(|s| s.to_string())
}
