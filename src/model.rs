use std::collections::HashMap;

use chrono::NaiveDate;

use crate::aggregate::{self, GroupStanding};
use crate::distribution::{self, MatchDistribution};
use crate::ingest::RawTable;
use crate::parse::{MatchIndex, MatchRecord, PickSheet, PlayerRecord, Roster};
use crate::pipeline::PlayerStanding;
use crate::replay::{self, WeeklyRankPoint};
use crate::similarity::{self, GameFilter, SimilarityCell};
use crate::whatif::{self, WhatIfOutcome};

/// The fully derived analytical snapshot. Built whole from the three raw
/// tables and never mutated; derived views (`similarity`, `what_if`,
/// `as_of_week`) allocate fresh values on every call.
#[derive(Debug, Clone)]
pub struct Model {
    pub matches: MatchIndex,
    pub picks: PickSheet,
    pub roster: Roster,
    pub distribution: HashMap<String, MatchDistribution>,
    pub leaderboard: Vec<PlayerStanding>,
    pub by_team: Vec<GroupStanding>,
    pub by_position: Vec<GroupStanding>,
    pub funk_eng_cup: Vec<PlayerStanding>,
    pub teams: Vec<String>,
    pub weeks: Vec<u32>,
    pub latest_completed_week: Option<u32>,
    /// The inputs the model was built from, so a snapshot can be rebuilt or
    /// round-tripped without re-reading the sources.
    pub raw_matches: RawTable,
    pub raw_picks: RawTable,
    pub raw_roster: RawTable,
}

/// Single entry point: same inputs, same model.
pub fn build_model(matches: &RawTable, picks: &RawTable, roster: &RawTable) -> Model {
    let index = MatchIndex::from_table(matches);
    let sheet = PickSheet::from_table(picks);
    let roster_parsed = Roster::from_table(roster);

    let dist = distribution::compute_pick_distribution(&index, &sheet);
    let leaderboard = replay::standings_as_of_week(&index, &sheet, &roster_parsed, &dist, None);
    let by_team = aggregate::group_by_team(&leaderboard);
    let by_position = aggregate::group_by_position(&leaderboard);
    let funk_eng_cup = aggregate::funk_eng_cup(&leaderboard);
    let teams = index.team_names();
    let weeks = index.weeks();
    let latest_completed_week = index.latest_completed_week();

    Model {
        matches: index,
        picks: sheet,
        roster: roster_parsed,
        distribution: dist,
        leaderboard,
        by_team,
        by_position,
        funk_eng_cup,
        teams,
        weeks,
        latest_completed_week,
        raw_matches: matches.clone(),
        raw_picks: picks.clone(),
        raw_roster: roster.clone(),
    }
}

impl Model {
    pub fn similarity(&self, filter: &GameFilter) -> Vec<Vec<SimilarityCell>> {
        similarity::compute_similarity(&self.matches, &self.picks, filter)
    }

    pub fn what_if(&self, overlay: &HashMap<String, String>) -> WhatIfOutcome {
        whatif::compute_what_if(
            &self.matches,
            &self.picks,
            &self.roster,
            &self.distribution,
            &self.leaderboard,
            overlay,
        )
    }

    pub fn as_of_week(&self, week: Option<u32>) -> Vec<PlayerStanding> {
        replay::standings_as_of_week(&self.matches, &self.picks, &self.roster, &self.distribution, week)
    }

    pub fn rank_trajectory(&self) -> HashMap<String, Vec<WeeklyRankPoint>> {
        replay::rank_trajectory(&self.matches, &self.picks, &self.roster, &self.distribution)
    }

    pub fn standing(&self, name: &str) -> Option<&PlayerStanding> {
        self.leaderboard.iter().find(|p| p.name == name)
    }

    pub fn roster_entry(&self, name: &str) -> Option<&PlayerRecord> {
        self.roster.get(name)
    }

    /// Undecided matches in chronological order (unparseable dates sink to
    /// the end in schedule order).
    pub fn upcoming_matches(&self) -> Vec<&MatchRecord> {
        let mut rows: Vec<&MatchRecord> = self
            .matches
            .matches
            .iter()
            .filter(|m| !m.is_decided())
            .collect();
        rows.sort_by_key(|m| {
            (
                m.date_parsed().is_none(),
                m.date_parsed(),
                m.time_parsed(),
                m.game_number,
            )
        });
        rows
    }

    pub fn next_upcoming_date(&self) -> Option<NaiveDate> {
        self.upcoming_matches()
            .iter()
            .find_map(|m| m.date_parsed())
    }

    /// The most recent calendar day with at least one decided match.
    pub fn latest_decided_date(&self) -> Option<NaiveDate> {
        self.matches
            .matches
            .iter()
            .filter(|m| m.is_decided())
            .filter_map(|m| m.date_parsed())
            .max()
    }

    /// Decided matches played on the most recent decided day.
    pub fn matches_on_latest_date(&self) -> Vec<&MatchRecord> {
        let Some(latest) = self.latest_decided_date() else {
            return Vec::new();
        };
        self.matches
            .matches
            .iter()
            .filter(|m| m.is_decided() && m.date_parsed() == Some(latest))
            .collect()
    }
}
