// src/parse/headers.rs

//! Header normalizer.
//!
//! Maps raw, positional, or ambiguous column headers to stable semantic
//! field names. The disambiguation logic lives in an ordered rule table so
//! it can be tested independently of any parsing and extended without
//! touching control flow.

use crate::error::Result;
use crate::models::TableKind;

use super::locate::{HeaderCell, TableHandle};

/// One resolved column: original header text, machine key, final name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub raw_label: String,
    pub data_key: Option<String>,
    pub name: String,
}

/// Ordered column layout for one table instance.
///
/// Built once per table and reused for every body row. Names are unique
/// and non-empty after disambiguation.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub kind: TableKind,
    pub columns: Vec<Column>,
}

impl ColumnSpec {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// What a header rule matches on.
enum On {
    /// The visible header label, exactly
    Label(&'static str),
    /// The machine-readable key, exactly
    Key(&'static str),
}

/// Predicate over the previous column's resolved name.
enum Prior {
    Any,
    EndsWith(&'static str),
    Equals(&'static str),
}

/// What a matching rule produces.
enum Action {
    /// This cell names the percentage of the preceding column: the
    /// resolved name becomes `<prior>_Pct`, keeping the cell aligned to
    /// its own body-cell position instead of colliding with the prior.
    PctOfPrior,
    /// Fixed replacement name
    Rename(&'static str),
}

struct HeaderRule {
    /// Table kinds the rule applies to; `None` means every kind
    kinds: Option<&'static [TableKind]>,
    on: On,
    prior: Prior,
    action: Action,
}

const ROSTER: &[TableKind] = &[TableKind::Roster];
const PLAYER_STATS: &[TableKind] = &[TableKind::PerGame, TableKind::Totals];
const TEAM_MISC: &[TableKind] = &[TableKind::TeamMisc];
const SALARIES: &[TableKind] = &[TableKind::Salaries];
const BOX: &[TableKind] = &[TableKind::BoxBasic, TableKind::BoxAdvanced];

/// Disambiguation rules, checked in order; the first match wins.
const HEADER_RULES: &[HeaderRule] = &[
    // A bare "%" column belongs to the shooting family it follows.
    HeaderRule {
        kinds: None,
        on: On::Label("%"),
        prior: Prior::EndsWith("3P"),
        action: Action::PctOfPrior,
    },
    HeaderRule {
        kinds: None,
        on: On::Label("%"),
        prior: Prior::EndsWith("FG"),
        action: Action::PctOfPrior,
    },
    HeaderRule {
        kinds: None,
        on: On::Label("%"),
        prior: Prior::EndsWith("FT"),
        action: Action::PctOfPrior,
    },
    HeaderRule {
        kinds: None,
        on: On::Label("%"),
        prior: Prior::EndsWith("2P"),
        action: Action::PctOfPrior,
    },
    HeaderRule {
        kinds: None,
        on: On::Label("%"),
        prior: Prior::EndsWith("eFG"),
        action: Action::PctOfPrior,
    },
    HeaderRule {
        kinds: None,
        on: On::Label("Birth"),
        prior: Prior::Any,
        action: Action::Rename("Country_Birth"),
    },
    HeaderRule {
        kinds: Some(ROSTER),
        on: On::Label("No."),
        prior: Prior::Any,
        action: Action::Rename("Jersey_No"),
    },
    HeaderRule {
        kinds: Some(ROSTER),
        on: On::Label("Player"),
        prior: Prior::Any,
        action: Action::Rename("Player_Name_Roster"),
    },
    HeaderRule {
        kinds: Some(PLAYER_STATS),
        on: On::Label("Player"),
        prior: Prior::Any,
        action: Action::Rename("Player_Name_Stats"),
    },
    HeaderRule {
        kinds: Some(TEAM_MISC),
        on: On::Label("Arena"),
        prior: Prior::Any,
        action: Action::Rename("Arena_Name"),
    },
    // The misc table repeats eFG%/TOV%/FT/FGA for offense and defense;
    // position relative to the preceding column tells them apart.
    HeaderRule {
        kinds: Some(TEAM_MISC),
        on: On::Label("eFG%"),
        prior: Prior::Equals("3PAr"),
        action: Action::Rename("eFG_Pct_Off"),
    },
    HeaderRule {
        kinds: Some(TEAM_MISC),
        on: On::Label("TOV%"),
        prior: Prior::Equals("eFG_Pct_Off"),
        action: Action::Rename("TOV_Pct_Off"),
    },
    HeaderRule {
        kinds: Some(TEAM_MISC),
        on: On::Label("FT/FGA"),
        prior: Prior::Equals("ORB_Pct"),
        action: Action::Rename("FT_per_FGA_Off"),
    },
    HeaderRule {
        kinds: Some(TEAM_MISC),
        on: On::Label("eFG%"),
        prior: Prior::Equals("FT_per_FGA_Off"),
        action: Action::Rename("eFG_Pct_Def"),
    },
    HeaderRule {
        kinds: Some(TEAM_MISC),
        on: On::Label("TOV%"),
        prior: Prior::Equals("eFG_Pct_Def"),
        action: Action::Rename("TOV_Pct_Def"),
    },
    HeaderRule {
        kinds: Some(TEAM_MISC),
        on: On::Label("FT/FGA"),
        prior: Prior::Equals("DRB_Pct"),
        action: Action::Rename("FT_per_FGA_Def"),
    },
    HeaderRule {
        kinds: Some(SALARIES),
        on: On::Key("ranker"),
        prior: Prior::Any,
        action: Action::Rename("Rk_Sal"),
    },
    HeaderRule {
        kinds: Some(SALARIES),
        on: On::Key("player"),
        prior: Prior::Any,
        action: Action::Rename("Player_In_Salary_Table"),
    },
    HeaderRule {
        kinds: Some(SALARIES),
        on: On::Key("salary"),
        prior: Prior::Any,
        action: Action::Rename("Salary_Value"),
    },
    HeaderRule {
        kinds: Some(BOX),
        on: On::Key("player"),
        prior: Prior::Any,
        action: Action::Rename("Player_Name_Full"),
    },
    HeaderRule {
        kinds: Some(BOX),
        on: On::Key("mp"),
        prior: Prior::Any,
        action: Action::Rename("MP"),
    },
];

impl HeaderRule {
    fn matches(&self, kind: TableKind, label: &str, key: Option<&str>, prior: &str) -> bool {
        if let Some(kinds) = self.kinds {
            if !kinds.contains(&kind) {
                return false;
            }
        }
        let subject_matches = match self.on {
            On::Label(wanted) => label == wanted,
            On::Key(wanted) => key == Some(wanted),
        };
        if !subject_matches {
            return false;
        }
        match self.prior {
            Prior::Any => true,
            Prior::EndsWith(suffix) => !prior.is_empty() && prior.ends_with(suffix),
            Prior::Equals(wanted) => prior == wanted,
        }
    }
}

/// Replace the punctuation the reference site uses in header labels with
/// identifier-safe equivalents.
fn sanitize(raw: &str) -> String {
    raw.replace('%', "_Pct")
        .replace('/', "_per_")
        .replace('.', "")
        .replace('-', "_")
        .replace(' ', "_")
}

/// Build the column layout for a located table.
pub fn build_column_spec(table: &TableHandle, kind: TableKind) -> Result<ColumnSpec> {
    Ok(resolve_columns(&table.header_cells()?, kind))
}

/// Resolve header cells into a ColumnSpec. Pure; exposed for rule tests.
pub fn resolve_columns(cells: &[HeaderCell], kind: TableKind) -> ColumnSpec {
    let mut columns: Vec<Column> = Vec::with_capacity(cells.len());

    for (index, cell) in cells.iter().enumerate() {
        let label = cell.label.trim();
        let key = cell.data_key.as_deref().filter(|k| !k.is_empty());
        let prior = columns.last().map(|c| c.name.as_str()).unwrap_or("");

        let rule = HEADER_RULES
            .iter()
            .find(|rule| rule.matches(kind, label, key, prior));

        let mut name = match rule.map(|r| &r.action) {
            Some(Action::PctOfPrior) => format!("{prior}_Pct"),
            Some(Action::Rename(replacement)) => (*replacement).to_string(),
            None => {
                let base = if kind.prefers_data_key() && key.is_some() {
                    key
                } else if !label.is_empty() {
                    Some(label)
                } else {
                    key
                };
                base.map(sanitize).unwrap_or_default()
            }
        };

        if name.is_empty() {
            name = format!("column_{index}");
        }
        if columns.iter().any(|c| c.name == name) {
            name = format!("{name}_{index}");
        }

        columns.push(Column {
            raw_label: label.to_string(),
            data_key: key.map(|k| k.to_string()),
            name,
        });
    }

    ColumnSpec { kind, columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(label: &str, key: Option<&str>) -> HeaderCell {
        HeaderCell {
            label: label.to_string(),
            data_key: key.map(|k| k.to_string()),
        }
    }

    fn names(cells: &[HeaderCell], kind: TableKind) -> Vec<String> {
        resolve_columns(cells, kind)
            .columns
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn test_pct_merges_into_shooting_family() {
        for prefix in ["3P", "FG", "FT", "2P", "eFG"] {
            let cells = vec![cell(prefix, None), cell("%", None)];
            let resolved = names(&cells, TableKind::TeamOpponent);
            assert_eq!(resolved, vec![prefix.to_string(), format!("{prefix}_Pct")]);
        }
    }

    #[test]
    fn test_stray_pct_does_not_merge() {
        let cells = vec![cell("AST", None), cell("%", None)];
        let resolved = names(&cells, TableKind::TeamOpponent);
        // Sanitizing "%" alone still yields a non-empty, unique name.
        assert_eq!(resolved, vec!["AST".to_string(), "_Pct".to_string()]);
    }

    #[test]
    fn test_roster_renames() {
        let cells = vec![
            cell("No.", None),
            cell("Player", Some("player")),
            cell("Birth", None),
            cell("Birth Date", None),
        ];
        let resolved = names(&cells, TableKind::Roster);
        assert_eq!(
            resolved,
            vec!["Jersey_No", "Player_Name_Roster", "Country_Birth", "Birth_Date"]
        );
    }

    #[test]
    fn test_player_rename_depends_on_table_kind() {
        let cells = vec![cell("Player", Some("player"))];
        assert_eq!(names(&cells, TableKind::PerGame), vec!["Player_Name_Stats"]);
        assert_eq!(names(&cells, TableKind::Totals), vec!["Player_Name_Stats"]);
        assert_eq!(names(&cells, TableKind::Roster), vec!["Player_Name_Roster"]);
    }

    #[test]
    fn test_team_misc_positional_chain() {
        let cells = vec![
            cell("FTr", None),
            cell("3PAr", None),
            cell("eFG%", None),
            cell("TOV%", None),
            cell("ORB%", None),
            cell("FT/FGA", None),
            cell("eFG%", None),
            cell("TOV%", None),
            cell("DRB%", None),
            cell("FT/FGA", None),
            cell("Arena", None),
        ];
        let resolved = names(&cells, TableKind::TeamMisc);
        assert_eq!(
            resolved,
            vec![
                "FTr",
                "3PAr",
                "eFG_Pct_Off",
                "TOV_Pct_Off",
                "ORB_Pct",
                "FT_per_FGA_Off",
                "eFG_Pct_Def",
                "TOV_Pct_Def",
                "DRB_Pct",
                "FT_per_FGA_Def",
                "Arena_Name",
            ]
        );
    }

    #[test]
    fn test_salary_key_renames() {
        let cells = vec![
            cell("Rk", Some("ranker")),
            cell("", Some("player")),
            cell("Salary", Some("salary")),
        ];
        let resolved = names(&cells, TableKind::Salaries);
        assert_eq!(
            resolved,
            vec!["Rk_Sal", "Player_In_Salary_Table", "Salary_Value"]
        );
    }

    #[test]
    fn test_box_tables_prefer_data_keys() {
        let cells = vec![
            cell("Starters", Some("player")),
            cell("MP", Some("mp")),
            cell("FG%", Some("fg_pct")),
            cell("+/-", Some("plus_minus")),
        ];
        let resolved = names(&cells, TableKind::BoxBasic);
        assert_eq!(
            resolved,
            vec!["Player_Name_Full", "MP", "fg_pct", "plus_minus"]
        );
    }

    #[test]
    fn test_blank_header_falls_back_to_key_then_position() {
        let cells = vec![cell("", Some("efg_pct")), cell("", None)];
        let resolved = names(&cells, TableKind::TeamOpponent);
        assert_eq!(resolved, vec!["efg_pct", "column_1"]);
    }

    #[test]
    fn test_collisions_get_positional_suffix() {
        let cells = vec![cell("MP", None), cell("MP", None)];
        let resolved = names(&cells, TableKind::TeamOpponent);
        assert_eq!(resolved, vec!["MP", "MP_1"]);
    }

    #[test]
    fn test_names_always_unique_and_non_empty() {
        let cells = vec![
            cell("FG", None),
            cell("%", None),
            cell("FG", None),
            cell("%", None),
            cell("", None),
        ];
        let spec = resolve_columns(&cells, TableKind::TeamOpponent);
        let mut seen = std::collections::HashSet::new();
        for name in spec.names() {
            assert!(!name.is_empty());
            assert!(seen.insert(name.to_string()), "duplicate name {name}");
        }
    }
}
