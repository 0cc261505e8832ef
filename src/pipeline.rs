use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::distribution::MatchDistribution;
use crate::parse::{MatchIndex, PickSheet, Position, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Win,
    Loss,
    /// Match not yet decided; transparent to counters and streaks.
    Pending,
}

impl GameOutcome {
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Win => "W",
            Self::Loss => "L",
            Self::Pending => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakKind {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub count: u32,
    pub start_game: u32,
    pub end_game: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_number: u32,
    pub week: Option<u32>,
    pub pick: String,
    pub outcome: GameOutcome,
    pub cumulative_wins: u32,
    pub cumulative_losses: u32,
    /// Pick went against an existing majority. Only evaluated once the match
    /// is decided; nobody is contrarian when the pool split evenly.
    pub contrarian: bool,
    /// Majority share on this match at season lock, for threshold consumers.
    pub chalk_pct: u32,
}

/// One pool entrant's fully derived season line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub name: String,
    pub team: Option<String>,
    pub position: Option<Position>,
    pub wins: u32,
    pub losses: u32,
    pub games: u32,
    pub win_pct: f64,
    pub rank: u32,
    /// Last five decided results, oldest first.
    pub recent_form: Vec<GameOutcome>,
    pub results: Vec<GameResult>,
    pub current_streak: Option<Streak>,
    pub longest_win_streak: Option<Streak>,
    pub longest_loss_streak: Option<Streak>,
    pub contrarian_picks: u32,
    pub contrarian_wins: u32,
}

/// Running streak under construction while walking a player's history.
#[derive(Debug, Clone, Copy)]
struct OpenStreak {
    kind: StreakKind,
    count: u32,
    start_game: u32,
    last_game: u32,
}

impl OpenStreak {
    fn new(kind: StreakKind, game: u32) -> Self {
        Self {
            kind,
            count: 1,
            start_game: game,
            last_game: game,
        }
    }

    fn closed(&self) -> Streak {
        Streak {
            kind: self.kind,
            count: self.count,
            start_game: self.start_game,
            end_game: self.last_game,
        }
    }
}

/// Derive every entrant's history and counters in pick-sheet row order.
///
/// `up_to_week` truncates the season: matches in later weeks are skipped
/// entirely, which is how the as-of-week replay reuses this pass.
pub fn compute_histories(
    index: &MatchIndex,
    sheet: &PickSheet,
    roster: &Roster,
    distribution: &HashMap<String, MatchDistribution>,
    up_to_week: Option<u32>,
) -> Vec<PlayerStanding> {
    sheet
        .rows
        .iter()
        .map(|row| {
            let mut wins = 0u32;
            let mut losses = 0u32;
            let mut contrarian_picks = 0u32;
            let mut contrarian_wins = 0u32;
            let mut results: Vec<GameResult> = Vec::with_capacity(row.picks.len());
            let mut current: Option<OpenStreak> = None;
            let mut open: Option<OpenStreak> = None;
            let mut longest_win: Option<Streak> = None;
            let mut longest_loss: Option<Streak> = None;

            for (col_idx, col) in sheet.columns.iter().enumerate() {
                let Some(m) = index.resolve(col) else {
                    continue;
                };
                if let (Some(limit), Some(week)) = (up_to_week, m.week)
                    && week > limit
                {
                    continue;
                }
                let Some(Some(pick)) = row.picks.get(col_idx) else {
                    continue;
                };
                if *pick != m.team1 && *pick != m.team2 {
                    // Desynced value: not a pick for either side, so no record.
                    continue;
                }
                let dist = distribution.get(&m.key());
                let chalk_pct = dist.map(|d| d.chalk_pct).unwrap_or(0);

                let winner = match &m.winner {
                    Some(w) => w,
                    None => {
                        // Undecided: keep the pick on record, advance nothing.
                        results.push(GameResult {
                            game_number: m.game_number,
                            week: m.week,
                            pick: pick.clone(),
                            outcome: GameOutcome::Pending,
                            cumulative_wins: wins,
                            cumulative_losses: losses,
                            contrarian: false,
                            chalk_pct,
                        });
                        continue;
                    }
                };

                let outcome = if winner == pick {
                    GameOutcome::Win
                } else {
                    GameOutcome::Loss
                };
                let kind = match outcome {
                    GameOutcome::Win => StreakKind::Win,
                    _ => StreakKind::Loss,
                };
                match outcome {
                    GameOutcome::Win => wins += 1,
                    _ => losses += 1,
                }

                let contrarian = dist
                    .and_then(|d| d.chalk.as_deref())
                    .is_some_and(|chalk| chalk != pick.as_str());
                if contrarian {
                    contrarian_picks += 1;
                    if outcome == GameOutcome::Win {
                        contrarian_wins += 1;
                    }
                }

                current = Some(match current {
                    Some(streak) if streak.kind == kind => OpenStreak {
                        count: streak.count + 1,
                        last_game: m.game_number,
                        ..streak
                    },
                    _ => OpenStreak::new(kind, m.game_number),
                });

                open = Some(match open {
                    Some(streak) if streak.kind == kind => OpenStreak {
                        count: streak.count + 1,
                        last_game: m.game_number,
                        ..streak
                    },
                    Some(streak) => {
                        close_out(&streak, &mut longest_win, &mut longest_loss);
                        OpenStreak::new(kind, m.game_number)
                    }
                    None => OpenStreak::new(kind, m.game_number),
                });

                results.push(GameResult {
                    game_number: m.game_number,
                    week: m.week,
                    pick: pick.clone(),
                    outcome,
                    cumulative_wins: wins,
                    cumulative_losses: losses,
                    contrarian,
                    chalk_pct,
                });
            }

            if let Some(streak) = open {
                close_out(&streak, &mut longest_win, &mut longest_loss);
            }

            let games = wins + losses;
            let win_pct = if games > 0 {
                wins as f64 / games as f64 * 100.0
            } else {
                0.0
            };
            let recent_form: Vec<GameOutcome> = {
                let decided: Vec<GameOutcome> = results
                    .iter()
                    .map(|r| r.outcome)
                    .filter(|o| *o != GameOutcome::Pending)
                    .collect();
                let skip = decided.len().saturating_sub(5);
                decided.into_iter().skip(skip).collect()
            };
            let record = roster.get(&row.name);

            PlayerStanding {
                name: row.name.clone(),
                team: record.and_then(|r| r.team.clone()),
                position: record.and_then(|r| r.position),
                wins,
                losses,
                games,
                win_pct,
                rank: 0,
                recent_form,
                results,
                current_streak: current.map(|s| s.closed()),
                longest_win_streak: longest_win,
                longest_loss_streak: longest_loss,
                contrarian_picks,
                contrarian_wins,
            }
        })
        .collect()
}

/// A run that just ended becomes the record run only when strictly longer;
/// ties keep the earlier one.
fn close_out(streak: &OpenStreak, longest_win: &mut Option<Streak>, longest_loss: &mut Option<Streak>) {
    let slot = match streak.kind {
        StreakKind::Win => longest_win,
        StreakKind::Loss => longest_loss,
    };
    if slot.is_none_or(|best| streak.count > best.count) {
        *slot = Some(streak.closed());
    }
}
