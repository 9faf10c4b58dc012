// src/parse/cells.rs

//! Per-cell type coercion.
//!
//! Cells are typed by their resolved field name, not by sniffing alone:
//! count-style fields become integers, rate fields become floats, salary
//! fields are cleaned of currency punctuation. A value that refuses to
//! parse is passed through as its raw string; coercion never fails a row.

use crate::models::CellValue;

/// Count-style fields, matched case-insensitively against both visible
/// labels (`FG`, `PTS`) and machine keys (`fg`, `plus_minus`).
const COUNT_FIELDS: &[&str] = &[
    "rk",
    "rk_sal",
    "ranker",
    "age",
    "g",
    "gs",
    "games",
    "games_started",
    "fg",
    "fga",
    "3p",
    "3pa",
    "fg3",
    "fg3a",
    "2p",
    "2pa",
    "fg2",
    "fg2a",
    "ft",
    "fta",
    "orb",
    "drb",
    "trb",
    "ast",
    "stl",
    "blk",
    "tov",
    "pf",
    "pts",
    "plus_minus",
    "ortg",
    "drtg",
    "off_rtg",
    "def_rtg",
    "gmsc",
    "game_score",
    "attendance",
    "w",
    "l",
    "wins",
    "losses",
    "pw",
    "pl",
    "trp_dbl",
    "tpl_dbl",
];

/// Rate fields that do not carry the `_Pct` suffix.
const RATE_FIELDS: &[&str] = &[
    "3par", "ftr", "ft_per_fga", "bpm", "obpm", "dbpm", "per", "vorp", "ws", "ows", "dws",
    "ws_per_48", "pace", "srs", "mov", "sos",
];

fn is_count_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    COUNT_FIELDS.contains(&lower.as_str())
}

fn is_rate_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with("_pct") || RATE_FIELDS.contains(&lower.as_str())
}

fn is_salary_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower == "salary_value" || lower == "salary"
}

/// Coerce one cell by its resolved field name.
pub fn coerce(name: &str, text: &str) -> CellValue {
    if text.is_empty() {
        return CellValue::Null;
    }
    // Jersey numbers look numeric but "00" and "0" are distinct jerseys.
    if name == "Jersey_No" {
        return CellValue::Str(text.to_string());
    }
    if is_salary_field(name) {
        return salary_value(text);
    }
    if is_count_field(name) {
        return int_value(text);
    }
    if is_rate_field(name) {
        return float_value(text);
    }
    CellValue::Str(text.to_string())
}

/// Parse an integer, stripping thousands separators. Per-game averages of
/// count stats parse as floats instead; anything else passes through raw.
pub fn int_value(text: &str) -> CellValue {
    if text.is_empty() {
        return CellValue::Null;
    }
    let stripped = text.replace(',', "");
    if let Ok(v) = stripped.parse::<i64>() {
        return CellValue::Int(v);
    }
    if let Ok(v) = stripped.parse::<f64>() {
        return CellValue::Float(v);
    }
    CellValue::Str(text.to_string())
}

/// Parse a float, passing unparseable text through raw.
pub fn float_value(text: &str) -> CellValue {
    if text.is_empty() {
        return CellValue::Null;
    }
    match text.parse::<f64>() {
        Ok(v) => CellValue::Float(v),
        Err(_) => CellValue::Str(text.to_string()),
    }
}

/// Clean a currency amount: strip `$` and separators, parse as integer.
pub fn salary_value(text: &str) -> CellValue {
    if text.is_empty() {
        return CellValue::Null;
    }
    let cleaned = text.replace('$', "").replace(',', "");
    match cleaned.parse::<i64>() {
        Ok(v) => CellValue::Int(v),
        Err(_) => CellValue::Str(text.to_string()),
    }
}
