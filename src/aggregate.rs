use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::parse::Position;
use crate::pipeline::PlayerStanding;
use crate::rank;

/// Averaged standings for a team or a position bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStanding {
    pub name: String,
    pub player_count: u32,
    pub members: Vec<String>,
    pub avg_wins: f64,
    pub avg_losses: f64,
    pub avg_games: f64,
    pub win_pct: f64,
    pub rank: u32,
}

pub fn group_by_team(standings: &[PlayerStanding]) -> Vec<GroupStanding> {
    group_by(standings, |p| p.team.clone())
}

pub fn group_by_position(standings: &[PlayerStanding]) -> Vec<GroupStanding> {
    group_by(standings, |p| p.position.map(|pos| pos.label().to_string()))
}

/// The Funk-Eng Cup: the front-end (Leads and Seconds) ranked on their own.
pub fn funk_eng_cup(standings: &[PlayerStanding]) -> Vec<PlayerStanding> {
    let mut rows: Vec<PlayerStanding> = standings
        .iter()
        .filter(|p| matches!(p.position, Some(Position::Lead) | Some(Position::Second)))
        .cloned()
        .collect();
    rank::rank_players(&mut rows);
    rows
}

/// Players without a bucket value are left out; bucket order follows first
/// appearance so tie ranks stay deterministic.
fn group_by(
    standings: &[PlayerStanding],
    bucket: impl Fn(&PlayerStanding) -> Option<String>,
) -> Vec<GroupStanding> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<&PlayerStanding>> = HashMap::new();
    for p in standings {
        let Some(name) = bucket(p) else {
            continue;
        };
        if !buckets.contains_key(&name) {
            order.push(name.clone());
        }
        buckets.entry(name).or_default().push(p);
    }

    let mut rows: Vec<GroupStanding> = order
        .into_iter()
        .map(|name| {
            let members = &buckets[&name];
            let n = members.len() as f64;
            let avg_wins = members.iter().map(|p| p.wins as f64).sum::<f64>() / n;
            let avg_losses = members.iter().map(|p| p.losses as f64).sum::<f64>() / n;
            let avg_games = avg_wins + avg_losses;
            let win_pct = if avg_games > 0.0 {
                avg_wins / avg_games * 100.0
            } else {
                0.0
            };
            GroupStanding {
                name,
                player_count: members.len() as u32,
                members: members.iter().map(|p| p.name.clone()).collect(),
                avg_wins: round1(avg_wins),
                avg_losses: round1(avg_losses),
                avg_games: round1(avg_games),
                win_pct,
                rank: 0,
            }
        })
        .collect();

    rank::rank_groups(&mut rows);
    rows
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
