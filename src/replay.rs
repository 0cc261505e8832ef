use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::distribution::MatchDistribution;
use crate::parse::{MatchIndex, PickSheet, Roster};
use crate::pipeline::{self, PlayerStanding};
use crate::rank;

/// Standings at the end of week `week`: matches in later weeks are treated
/// as not yet played regardless of their recorded winner. `None` means the
/// current table (no truncation).
pub fn standings_as_of_week(
    index: &MatchIndex,
    sheet: &PickSheet,
    roster: &Roster,
    distribution: &HashMap<String, MatchDistribution>,
    week: Option<u32>,
) -> Vec<PlayerStanding> {
    let mut standings = pipeline::compute_histories(index, sheet, roster, distribution, week);
    rank::rank_players(&mut standings);
    standings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRankPoint {
    pub week: u32,
    pub rank: u32,
    pub wins: u32,
    pub losses: u32,
}

/// Week-by-week rank line per entrant, the series behind the standings
/// chart. One replay per known week.
pub fn rank_trajectory(
    index: &MatchIndex,
    sheet: &PickSheet,
    roster: &Roster,
    distribution: &HashMap<String, MatchDistribution>,
) -> HashMap<String, Vec<WeeklyRankPoint>> {
    let mut out: HashMap<String, Vec<WeeklyRankPoint>> = sheet
        .rows
        .iter()
        .map(|row| (row.name.clone(), Vec::new()))
        .collect();

    for week in index.weeks() {
        let standings = standings_as_of_week(index, sheet, roster, distribution, Some(week));
        for p in &standings {
            if let Some(points) = out.get_mut(&p.name) {
                points.push(WeeklyRankPoint {
                    week,
                    rank: p.rank,
                    wins: p.wins,
                    losses: p.losses,
                });
            }
        }
    }
    out
}
