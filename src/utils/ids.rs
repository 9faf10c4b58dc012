// src/utils/ids.rs

//! Identifier extraction from reference-site hrefs.
//!
//! Team, game and player identifiers are embedded in link targets rather
//! than exposed as attributes, so every assembler parses them out of hrefs.

use regex::Regex;

/// Extract a three-letter team abbreviation from a team-season href
/// such as `/teams/BOS/2024.html`.
pub fn team_abbr_from_href(href: &str) -> Option<String> {
    let pattern = Regex::new(r"/teams/([A-Z]{3})/\d{4}\.html").ok()?;
    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a game identifier from a box-score href such as
/// `/boxscores/202410220BOS.html`.
pub fn game_id_from_box_href(href: &str) -> Option<String> {
    let pattern = Regex::new(r"/boxscores/(\d{8}0[A-Z]{3})\.html").ok()?;
    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a game identifier from a sort-key attribute value, which leads
/// with the same `YYYYMMDD0ABC` shape used by box-score links.
pub fn game_id_from_sort_key(csk: &str) -> Option<String> {
    let pattern = Regex::new(r"^(\d{8}0[A-Z]{3})").ok()?;
    pattern
        .captures(csk)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a player slug from a profile href such as
/// `/players/j/jamesle01.html`.
pub fn player_id_from_href(href: &str) -> Option<String> {
    let pattern = Regex::new(r"/players/[a-z]/([a-z0-9]+)\.html").ok()?;
    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
