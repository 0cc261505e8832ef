use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ingest::RawTable;

/// Header pattern for a picks-sheet game column, e.g.
/// `Week 3 | 11/12/2025 | 7:45 PM | Sheet 2`.
static GAME_COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Week\s+(\d+)\s*\|\s*([^|]+)\s*\|\s*([^|]+)\s*\|\s*Sheet\s+(\d+)")
        .expect("game column pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Dense 1-based index in schedule (input) order.
    pub game_number: u32,
    pub week_raw: String,
    pub week: Option<u32>,
    pub date: String,
    pub time: String,
    pub sheet_raw: String,
    pub sheet: Option<u32>,
    pub team1: String,
    pub team2: String,
    pub winner: Option<String>,
    pub team1_number: Option<String>,
    pub team2_number: Option<String>,
    pub key_matchup: bool,
    pub pre_game_notes: Option<String>,
    pub post_game_notes: Option<String>,
}

impl MatchRecord {
    /// Composite join key shared with the picks sheet, verbatim fields.
    pub fn key(&self) -> String {
        game_key(&self.week_raw, &self.date, &self.time, &self.sheet_raw)
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// `M/D/YYYY` schedule date, when it parses.
    pub fn date_parsed(&self) -> Option<NaiveDate> {
        parse_schedule_date(&self.date)
    }

    /// `H:MM AM/PM` draw time, when it parses.
    pub fn time_parsed(&self) -> Option<NaiveTime> {
        parse_draw_time(&self.time)
    }

    /// Normalized numeric identity, used to cross-check the string key when
    /// the sheets drift in formatting.
    pub fn norm_key(&self) -> Option<NormKey> {
        Some(NormKey {
            week: self.week?,
            date: self.date_parsed()?,
            minutes: minutes_since_midnight(self.time_parsed()?),
            sheet: self.sheet?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormKey {
    pub week: u32,
    pub date: NaiveDate,
    pub minutes: u32,
    pub sheet: u32,
}

pub fn game_key(week: &str, date: &str, time: &str, sheet: &str) -> String {
    format!("{week}_{date}_{time}_{sheet}")
}

pub fn parse_schedule_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()
}

pub fn parse_draw_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%l:%M %p").ok()
}

fn minutes_since_midnight(time: NaiveTime) -> u32 {
    use chrono::Timelike;
    time.hour() * 60 + time.minute()
}

/// Schedule plus the lookup index over it. Resolution tries the verbatim
/// string key first and falls back to the normalized numeric key.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    pub matches: Vec<MatchRecord>,
    by_key: HashMap<String, usize>,
    by_norm: HashMap<NormKey, usize>,
}

impl MatchIndex {
    pub fn from_table(table: &RawTable) -> Self {
        let matches: Vec<MatchRecord> = table
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| parse_match_row(idx as u32 + 1, row))
            .collect();
        Self::from_matches(matches)
    }

    pub fn from_matches(matches: Vec<MatchRecord>) -> Self {
        let mut by_key = HashMap::with_capacity(matches.len());
        let mut by_norm = HashMap::with_capacity(matches.len());
        for (idx, m) in matches.iter().enumerate() {
            // Duplicate identities are not expected; last row wins.
            by_key.insert(m.key(), idx);
            if let Some(norm) = m.norm_key() {
                by_norm.insert(norm, idx);
            }
        }
        Self {
            matches,
            by_key,
            by_norm,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MatchRecord> {
        self.by_key.get(key).map(|idx| &self.matches[*idx])
    }

    pub fn resolve(&self, column: &GameColumn) -> Option<&MatchRecord> {
        if let Some(idx) = self.by_key.get(&column.key) {
            return Some(&self.matches[*idx]);
        }
        let norm = column.norm_key()?;
        self.by_norm.get(&norm).map(|idx| &self.matches[*idx])
    }

    /// Distinct skip names across the schedule, sorted for filter menus.
    pub fn team_names(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut names = Vec::new();
        for m in &self.matches {
            for team in [m.team1.as_str(), m.team2.as_str()] {
                if !team.is_empty() && seen.insert(team) {
                    names.push(team.to_string());
                }
            }
        }
        names.sort();
        names
    }

    /// Distinct parseable week numbers in ascending order.
    pub fn weeks(&self) -> Vec<u32> {
        let mut weeks: Vec<u32> = self
            .matches
            .iter()
            .filter_map(|m| m.week)
            .collect::<HashSet<u32>>()
            .into_iter()
            .collect();
        weeks.sort_unstable();
        weeks
    }

    /// Highest week whose every match is decided (weeks below it included).
    pub fn latest_completed_week(&self) -> Option<u32> {
        let mut latest = None;
        for week in self.weeks() {
            let done = self
                .matches
                .iter()
                .filter(|m| m.week == Some(week))
                .all(|m| m.is_decided());
            if !done {
                break;
            }
            latest = Some(week);
        }
        latest
    }
}

fn parse_match_row(game_number: u32, row: &HashMap<String, String>) -> MatchRecord {
    let cell = |name: &str| row.get(name).map(|v| v.trim().to_string()).unwrap_or_default();
    let optional = |name: &str| {
        let v = cell(name);
        (!v.is_empty()).then_some(v)
    };

    let week_raw = cell("Week");
    let sheet_raw = cell("Sheet");
    let winner = optional("Winner");
    MatchRecord {
        game_number,
        week: week_raw.parse().ok(),
        week_raw,
        date: cell("Date"),
        time: cell("Time"),
        sheet: sheet_raw.parse().ok(),
        sheet_raw,
        team1: cell("Team1_Skip"),
        team2: cell("Team2_Skip"),
        winner,
        team1_number: optional("Team1_Number"),
        team2_number: optional("Team2_Number"),
        key_matchup: cell("Key_Matchup").eq_ignore_ascii_case("true"),
        pre_game_notes: optional("Pre_Game_Notes"),
        post_game_notes: optional("Post_Game_Notes"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Skip,
    Vice,
    Second,
    Lead,
}

impl Position {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "vice" => Some(Self::Vice),
            "second" => Some(Self::Second),
            "lead" => Some(Self::Lead),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Skip => "Skip",
            Self::Vice => "Vice",
            Self::Second => "Second",
            Self::Lead => "Lead",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    /// Skip-of-record the player curls under.
    pub team: Option<String>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub players: Vec<PlayerRecord>,
    by_name: HashMap<String, usize>,
}

impl Roster {
    pub fn from_table(table: &RawTable) -> Self {
        let mut players: Vec<PlayerRecord> = Vec::with_capacity(table.rows.len());
        let mut by_name = HashMap::new();
        for row in &table.rows {
            let name = row.get("Name").map(|v| v.trim()).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let team = row
                .get("Team")
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string());
            let position = row.get("Position").and_then(|v| Position::parse(v));
            by_name.insert(name.to_string(), players.len());
            players.push(PlayerRecord {
                name: name.to_string(),
                team,
                position,
            });
        }
        Self { players, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.by_name.get(name).map(|idx| &self.players[*idx])
    }

    /// Distinct positions present, in rink order, for filter menus.
    pub fn positions(&self) -> Vec<Position> {
        [Position::Skip, Position::Vice, Position::Second, Position::Lead]
            .into_iter()
            .filter(|p| self.players.iter().any(|r| r.position == Some(*p)))
            .collect()
    }
}

/// One picks-sheet game column, identified by the four header captures.
#[derive(Debug, Clone, PartialEq)]
pub struct GameColumn {
    pub header: String,
    pub week: u32,
    pub date: String,
    pub time: String,
    pub sheet: u32,
    pub key: String,
}

impl GameColumn {
    fn norm_key(&self) -> Option<NormKey> {
        Some(NormKey {
            week: self.week,
            date: parse_schedule_date(&self.date)?,
            minutes: minutes_since_midnight(parse_draw_time(&self.time)?),
            sheet: self.sheet,
        })
    }
}

/// The picks table: one row per entrant, one column per match, plus whatever
/// metadata columns the form collected (those are ignored here).
#[derive(Debug, Clone, Default)]
pub struct PickSheet {
    pub name_column: Option<String>,
    pub columns: Vec<GameColumn>,
    pub rows: Vec<PickRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickRow {
    pub name: String,
    /// Aligned with `PickSheet::columns`; `None` when the cell was blank.
    pub picks: Vec<Option<String>>,
}

impl PickSheet {
    pub fn from_table(table: &RawTable) -> Self {
        let name_column = table
            .headers
            .iter()
            .find(|h| h.to_lowercase().contains("name"))
            .cloned();

        // Column order in the sheet is schedule order; preserve it.
        let columns: Vec<GameColumn> = table
            .headers
            .iter()
            .filter_map(|header| parse_game_column(header))
            .collect();

        let Some(name_column) = name_column else {
            return Self {
                name_column: None,
                columns,
                rows: Vec::new(),
            };
        };

        let mut rows = Vec::with_capacity(table.rows.len());
        for raw in &table.rows {
            let name = raw.get(&name_column).map(|v| v.trim()).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let picks = columns
                .iter()
                .map(|col| {
                    raw.get(&col.header)
                        .map(|v| v.trim())
                        .filter(|v| !v.is_empty())
                        .map(|v| v.to_string())
                })
                .collect();
            rows.push(PickRow {
                name: name.to_string(),
                picks,
            });
        }

        Self {
            name_column: Some(name_column),
            columns,
            rows,
        }
    }

    pub fn player_names(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.name.clone()).collect()
    }
}

/// A header that fails the pattern is simply not a game column.
pub fn parse_game_column(header: &str) -> Option<GameColumn> {
    let caps = GAME_COLUMN_RE.captures(header)?;
    let week: u32 = caps[1].parse().ok()?;
    let sheet: u32 = caps[4].parse().ok()?;
    let date = caps[2].trim().to_string();
    let time = caps[3].trim().to_string();
    let key = game_key(&caps[1], &date, &time, &caps[4]);
    Some(GameColumn {
        header: header.to_string(),
        week,
        date,
        time,
        sheet,
        key,
    })
}
