use serde::{Deserialize, Serialize};

use rayon::prelude::*;

use crate::parse::{MatchIndex, MatchRecord, PickSheet};

/// Which matches count toward a similarity comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum GameFilter {
    All,
    Decided,
    Undecided,
    Week(u32),
    Team(String),
}

impl GameFilter {
    pub fn matches(&self, m: &MatchRecord) -> bool {
        match self {
            Self::All => true,
            Self::Decided => m.is_decided(),
            Self::Undecided => !m.is_decided(),
            Self::Week(week) => m.week == Some(*week),
            Self::Team(team) => m.team1 == *team || m.team2 == *team,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickDifference {
    pub game_number: u32,
    pub week: Option<u32>,
    pub date: String,
    pub pick1: String,
    pub pick2: String,
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityCell {
    pub player1: String,
    pub player2: String,
    /// Integer-rounded share of matching picks, 0 when no shared games.
    pub similarity: u32,
    pub matching_games: u32,
    pub total_games: u32,
    pub differences: Vec<PickDifference>,
    pub is_self: bool,
}

/// NxN pick-agreement matrix over the pick-sheet rows, in sheet order.
/// A match counts for a pair only when both entrants picked it and it passes
/// the filter. Rows are independent, so they are computed in parallel.
pub fn compute_similarity(
    index: &MatchIndex,
    sheet: &PickSheet,
    filter: &GameFilter,
) -> Vec<Vec<SimilarityCell>> {
    // Resolve columns once; unresolvable columns never count for anyone.
    let resolved: Vec<Option<&MatchRecord>> = sheet
        .columns
        .iter()
        .map(|col| index.resolve(col).filter(|m| filter.matches(m)))
        .collect();

    (0..sheet.rows.len())
        .into_par_iter()
        .map(|i| {
            (0..sheet.rows.len())
                .map(|j| pair_cell(sheet, &resolved, i, j))
                .collect()
        })
        .collect()
}

fn pair_cell(
    sheet: &PickSheet,
    resolved: &[Option<&MatchRecord>],
    i: usize,
    j: usize,
) -> SimilarityCell {
    let row1 = &sheet.rows[i];
    let row2 = &sheet.rows[j];
    let mut matching = 0u32;
    let mut total = 0u32;
    let mut differences = Vec::new();

    for (col_idx, m) in resolved.iter().enumerate() {
        let Some(m) = m else {
            continue;
        };
        let (Some(Some(pick1)), Some(Some(pick2))) =
            (row1.picks.get(col_idx), row2.picks.get(col_idx))
        else {
            continue;
        };
        total += 1;
        if pick1 == pick2 {
            matching += 1;
        } else if i != j {
            differences.push(PickDifference {
                game_number: m.game_number,
                week: m.week,
                date: m.date.clone(),
                pick1: pick1.clone(),
                pick2: pick2.clone(),
                winner: m.winner.clone(),
            });
        }
    }

    let similarity = if i == j {
        100
    } else if total > 0 {
        (matching as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    SimilarityCell {
        player1: row1.name.clone(),
        player2: row2.name.clone(),
        similarity,
        matching_games: matching,
        total_games: total,
        differences,
        is_self: i == j,
    }
}
