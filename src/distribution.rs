use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::parse::{MatchIndex, PickSheet};

/// How the pool split on one match. Percentages are integer-rounded
/// (half away from zero) over the non-blank picks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDistribution {
    pub key: String,
    pub game_number: u32,
    pub team1: String,
    pub team2: String,
    pub team1_picks: u32,
    pub team2_picks: u32,
    pub team1_pct: u32,
    pub team2_pct: u32,
    /// Majority side; `None` on a tie or when nobody picked.
    pub chalk: Option<String>,
    /// Raw majority share (equal shares on a tie, 0 with no picks). Display
    /// defaults for the tie case are a presentation concern.
    pub chalk_pct: u32,
}

impl MatchDistribution {
    pub fn total_picks(&self) -> u32 {
        self.team1_picks + self.team2_picks
    }
}

pub fn compute_pick_distribution(
    index: &MatchIndex,
    sheet: &PickSheet,
) -> HashMap<String, MatchDistribution> {
    // Column index per resolved game number; orphan columns drop out here.
    let mut col_for_game: HashMap<u32, usize> = HashMap::with_capacity(sheet.columns.len());
    for (idx, col) in sheet.columns.iter().enumerate() {
        if let Some(m) = index.resolve(col) {
            col_for_game.insert(m.game_number, idx);
        }
    }

    let mut out = HashMap::with_capacity(index.len());
    for m in &index.matches {
        let key = m.key();
        let mut team1_picks = 0u32;
        let mut team2_picks = 0u32;

        if let Some(&col_idx) = col_for_game.get(&m.game_number) {
            for row in &sheet.rows {
                let Some(Some(pick)) = row.picks.get(col_idx) else {
                    continue;
                };
                if *pick == m.team1 {
                    team1_picks += 1;
                } else if *pick == m.team2 {
                    team2_picks += 1;
                }
                // Anything else is a desynced value; it votes for neither side.
            }
        }

        let total = team1_picks + team2_picks;
        let (team1_pct, team2_pct) = if total > 0 {
            (percent(team1_picks, total), percent(team2_picks, total))
        } else {
            (0, 0)
        };
        let chalk = if team1_picks > team2_picks {
            Some(m.team1.clone())
        } else if team2_picks > team1_picks {
            Some(m.team2.clone())
        } else {
            None
        };
        let chalk_pct = team1_pct.max(team2_pct);

        out.insert(
            key.clone(),
            MatchDistribution {
                key,
                game_number: m.game_number,
                team1: m.team1.clone(),
                team2: m.team2.clone(),
                team1_picks,
                team2_picks,
                team1_pct,
                team2_pct,
                chalk,
                chalk_pct,
            },
        );
    }
    out
}

fn percent(count: u32, total: u32) -> u32 {
    // f64::round is half-away-from-zero, matching the sheet's rounding.
    (count as f64 * 100.0 / total as f64).round() as u32
}
