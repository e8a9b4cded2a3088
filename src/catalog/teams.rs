//! Active-teams reference table.
//!
//! Hand-maintained catalog of the organization's active teams. The
//! comparability flag marks teams eligible for cross-team metric
//! comparison; it is independent data, not derived from the team type.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::normalize_search_term;
use crate::error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamType {
    Engineering,
    Qa,
}

impl TeamType {
    pub const ALL: [TeamType; 2] = [TeamType::Engineering, TeamType::Qa];

    pub fn id(self) -> &'static str {
        match self {
            TeamType::Engineering => "engineering",
            TeamType::Qa => "qa",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TeamType::Engineering => "Engineering Teams",
            TeamType::Qa => "Quality Assurance Teams",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TeamType::Engineering => "Software development and engineering teams",
            TeamType::Qa => "QA and testing teams - tracked separately from engineering squads",
        }
    }

    /// Comparability default for teams of this type.
    pub fn comparable(self) -> bool {
        matches!(self, TeamType::Engineering)
    }
}

impl std::fmt::Display for TeamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDescriptor {
    #[serde(skip_serializing)]
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    #[serde(rename = "type")]
    pub team_type: TeamType,
    pub description: &'static str,
    pub color: &'static str,
    pub comparable: bool,
    pub focus_areas: &'static [&'static str],
}

/// The full team reference table.
pub static TEAMS: [TeamDescriptor; 7] = [
    TeamDescriptor {
        id: "analytics",
        name: "Analytics",
        short_name: "Aly",
        team_type: TeamType::Engineering,
        description: "Analytics and data engineering team",
        color: "#DC143C", // crimson
        comparable: true,
        focus_areas: &["data analytics", "business intelligence", "data engineering"],
    },
    TeamDescriptor {
        id: "cfd_titans",
        name: "CFD (Titans)",
        short_name: "CFD",
        team_type: TeamType::Engineering,
        description: "CFD Titans engineering team",
        color: "#32CD32", // lime green
        comparable: true,
        focus_areas: &["Client Focus Delivery", "Support"],
    },
    TeamDescriptor {
        id: "core_crm",
        name: "Core CRM",
        short_name: "CC",
        team_type: TeamType::Engineering,
        description: "Core CRM platform team",
        color: "#4169E1", // royal blue
        comparable: true,
        focus_areas: &["customer relationship management", "core platform"],
    },
    TeamDescriptor {
        id: "integrations_synergy",
        name: "Integrations(Synergy)",
        short_name: "I",
        team_type: TeamType::Engineering,
        description: "Integrations and Synergy team",
        color: "#FF8C00", // dark orange
        comparable: true,
        focus_areas: &["system integrations", "api development", "third-party connections"],
    },
    TeamDescriptor {
        id: "media",
        name: "Media",
        short_name: "Med",
        team_type: TeamType::Engineering,
        description: "Media and content management team",
        color: "#00BFFF", // deep sky blue
        comparable: true,
        focus_areas: &["media processing", "content management", "digital assets"],
    },
    TeamDescriptor {
        id: "shinsei",
        name: "Shinsei",
        short_name: "S",
        team_type: TeamType::Engineering,
        description: "Shinsei development team",
        color: "#DA70D6", // orchid
        comparable: true,
        focus_areas: &["new product development", "innovation"],
    },
    TeamDescriptor {
        id: "qa_automation",
        name: "QA-Automation",
        short_name: "QA",
        team_type: TeamType::Qa,
        description: "Quality Assurance and Test Automation team",
        color: "#FFD700", // gold
        comparable: false,
        focus_areas: &["test automation", "quality assurance", "testing frameworks"],
    },
];

lazy_static! {
    /// Type → member team ids, grouped from the descriptor table.
    static ref TYPE_MEMBERS: HashMap<TeamType, Vec<&'static str>> = {
        let mut members: HashMap<TeamType, Vec<&'static str>> = TeamType::ALL
            .iter()
            .map(|t| (*t, Vec::new()))
            .collect();
        for team in TEAMS.iter() {
            members
                .get_mut(&team.team_type)
                .expect("grouping covers every type")
                .push(team.id);
        }
        members
    };
}

pub fn all() -> &'static [TeamDescriptor] {
    &TEAMS
}

pub fn find(id: &str) -> Option<&'static TeamDescriptor> {
    TEAMS.iter().find(|t| t.id == id)
}

/// Member team ids of a type, in table order.
pub fn members(team_type: TeamType) -> &'static [&'static str] {
    &TYPE_MEMBERS[&team_type]
}

/// Free-text search over team names, descriptions and focus areas, with
/// optional type and comparability filters applied after the match.
pub fn search(
    term: &str,
    team_type: Option<&str>,
    comparable_only: bool,
) -> Result<Vec<&'static TeamDescriptor>, ToolError> {
    let term = normalize_search_term(term)?;
    Ok(TEAMS
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&term)
                || t.description.to_lowercase().contains(&term)
                || t.focus_areas.iter().any(|a| a.to_lowercase().contains(&term))
        })
        .filter(|t| team_type.map_or(true, |ty| t.team_type.id() == ty))
        .filter(|t| !comparable_only || t.comparable)
        .collect())
}

fn teams_map<'a, I>(teams: I) -> Value
where
    I: IntoIterator<Item = &'a TeamDescriptor>,
{
    let mut map = Map::new();
    for team in teams {
        map.insert(
            team.id.to_string(),
            serde_json::to_value(team).expect("team descriptors serialize"),
        );
    }
    Value::Object(map)
}

fn types_info() -> Value {
    let mut map = Map::new();
    for team_type in TeamType::ALL {
        map.insert(
            team_type.id().to_string(),
            json!({
                "name": team_type.display_name(),
                "description": team_type.description(),
                "comparable": team_type.comparable(),
                "teams": members(team_type),
            }),
        );
    }
    Value::Object(map)
}

/// Full teams reference: every descriptor plus the type index.
pub fn list_response() -> Value {
    json!({
        "total_teams": TEAMS.len(),
        "team_types": TeamType::ALL.len(),
        "teams": teams_map(TEAMS.iter()),
        "types": types_info(),
        "usage_note": "Use team names in metrics queries. Engineering teams are comparable, QA teams should be analyzed separately.",
    })
}

/// One type's teams, or an index of all types with member counts. Unknown
/// type ids yield a structured not-found result enumerating the valid ids.
pub fn by_type_response(team_type: Option<&str>) -> Value {
    let Some(requested) = team_type else {
        let mut types = Map::new();
        for team_type in TeamType::ALL {
            types.insert(
                team_type.id().to_string(),
                json!({
                    "name": team_type.display_name(),
                    "description": team_type.description(),
                    "comparable": team_type.comparable(),
                    "team_count": members(team_type).len(),
                    "teams": members(team_type),
                }),
            );
        }
        return json!({
            "total_types": TeamType::ALL.len(),
            "types": types,
        });
    };

    let Some(team_type) = TeamType::from_id(requested) else {
        return json!({
            "error": format!("Team type '{requested}' not found"),
            "available_types": TeamType::ALL.iter().map(|t| t.id()).collect::<Vec<_>>(),
        });
    };

    let ids = members(team_type);
    json!({
        "team_type": team_type.id(),
        "name": team_type.display_name(),
        "description": team_type.description(),
        "comparable": team_type.comparable(),
        "total_teams": ids.len(),
        "teams": teams_map(ids.iter().filter_map(|id| find(id))),
    })
}

/// Partition of the full team set by the comparability flag.
pub fn comparable_response() -> Value {
    let (comparable, excluded): (Vec<_>, Vec<_>) = TEAMS.iter().partition(|t| t.comparable);
    json!({
        "total_comparable_teams": comparable.len(),
        "teams": teams_map(comparable),
        "excluded_teams": teams_map(excluded),
        "usage_note": "These teams can be compared in metrics analysis. QA teams are tracked separately.",
    })
}

/// Search result with the applied filters echoed back.
pub fn search_response(
    term: &str,
    team_type: Option<&str>,
    comparable_only: bool,
) -> Result<Value, ToolError> {
    let matches = search(term, team_type, comparable_only)?;
    Ok(json!({
        "search_term": normalize_search_term(term)?,
        "filters": {
            "team_type": team_type,
            "comparable_only": comparable_only,
        },
        "total_matches": matches.len(),
        "teams": teams_map(matches),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_index_consistent_with_table() {
        for team_type in TeamType::ALL {
            let grouped: Vec<&str> = TEAMS
                .iter()
                .filter(|t| t.team_type == team_type)
                .map(|t| t.id)
                .collect();
            assert_eq!(members(team_type), grouped.as_slice());
        }
    }

    #[test]
    fn test_comparable_partition_is_disjoint_and_exhaustive() {
        let comparable: Vec<&str> = TEAMS.iter().filter(|t| t.comparable).map(|t| t.id).collect();
        let excluded: Vec<&str> = TEAMS.iter().filter(|t| !t.comparable).map(|t| t.id).collect();
        assert_eq!(comparable.len(), 6);
        assert_eq!(excluded, vec!["qa_automation"]);
        assert_eq!(comparable.len() + excluded.len(), TEAMS.len());
        assert!(comparable.iter().all(|id| !excluded.contains(id)));
    }

    #[test]
    fn test_search_matches_focus_areas() {
        let matches = search("integration", None, false).unwrap();
        assert!(matches.iter().any(|t| t.id == "integrations_synergy"));

        let qa_only = search("automation", Some("qa"), false).unwrap();
        let ids: Vec<&str> = qa_only.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["qa_automation"]);
    }

    #[test]
    fn test_search_comparable_only_excludes_qa() {
        let unfiltered = search("quality", None, false).unwrap();
        assert!(unfiltered.iter().any(|t| t.id == "qa_automation"));

        let filtered = search("quality", None, true).unwrap();
        assert!(filtered.is_empty());
    }
}
