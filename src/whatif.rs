use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::distribution::MatchDistribution;
use crate::parse::{MatchIndex, PickSheet, Roster};
use crate::pipeline::{self, PlayerStanding};
use crate::rank;

/// Per-player movement against the baseline standings. Negative rank delta
/// means the player climbed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingDelta {
    pub name: String,
    pub wins_delta: i64,
    pub losses_delta: i64,
    pub rank_delta: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhatIfOutcome {
    pub standings: Vec<PlayerStanding>,
    pub deltas: Vec<StandingDelta>,
}

/// Rebuild the schedule with the hypothesized winners applied. A value that
/// names neither side of its match is dropped rather than poisoning every
/// pick on that match.
pub fn overlay_matches(index: &MatchIndex, overlay: &HashMap<String, String>) -> MatchIndex {
    let mut matches = index.matches.clone();
    for m in &mut matches {
        let Some(winner) = overlay.get(&m.key()) else {
            continue;
        };
        if *winner == m.team1 || *winner == m.team2 {
            m.winner = Some(winner.clone());
        }
    }
    MatchIndex::from_matches(matches)
}

/// Standings as they would read if each overlaid match finished with the
/// supplied winner. Chalk and contrarian flags stay at their season-lock
/// values, so the baseline distribution is reused as-is.
pub fn compute_what_if(
    index: &MatchIndex,
    sheet: &PickSheet,
    roster: &Roster,
    distribution: &HashMap<String, MatchDistribution>,
    baseline: &[PlayerStanding],
    overlay: &HashMap<String, String>,
) -> WhatIfOutcome {
    let overlaid = overlay_matches(index, overlay);
    let mut standings = pipeline::compute_histories(&overlaid, sheet, roster, distribution, None);
    rank::rank_players(&mut standings);

    let baseline_by_name: HashMap<&str, &PlayerStanding> =
        baseline.iter().map(|p| (p.name.as_str(), p)).collect();
    let deltas = standings
        .iter()
        .map(|p| {
            let base = baseline_by_name.get(p.name.as_str());
            StandingDelta {
                name: p.name.clone(),
                wins_delta: p.wins as i64 - base.map(|b| b.wins as i64).unwrap_or(0),
                losses_delta: p.losses as i64 - base.map(|b| b.losses as i64).unwrap_or(0),
                rank_delta: p.rank as i64 - base.map(|b| b.rank as i64).unwrap_or(0),
            }
        })
        .collect();

    WhatIfOutcome { standings, deltas }
}
