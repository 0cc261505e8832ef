use std::cmp::Ordering;

use crate::aggregate::GroupStanding;
use crate::pipeline::PlayerStanding;

/// Sort key used everywhere standings are ranked: wins first, then win
/// percentage. Both descending.
pub type RankScore = (f64, f64);

fn compare(a: &RankScore, b: &RankScore) -> Ordering {
    b.0
        .partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then(b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
}

/// Stable-sort rows best first and hand out competition ranks: equal scores
/// share the earlier rank and the following row skips past the tie block
/// (1, 1, 3). Stability keeps tie order at first appearance in the source.
pub fn sort_and_rank<T>(
    rows: &mut [T],
    score: impl Fn(&T) -> RankScore,
    set_rank: impl Fn(&mut T, u32),
) {
    rows.sort_by(|a, b| compare(&score(a), &score(b)));
    let mut prev: Option<RankScore> = None;
    let mut prev_rank = 0u32;
    for (idx, row) in rows.iter_mut().enumerate() {
        let s = score(row);
        let rank = match prev {
            Some(p) if p == s => prev_rank,
            _ => idx as u32 + 1,
        };
        set_rank(row, rank);
        prev = Some(s);
        prev_rank = rank;
    }
}

pub fn rank_players(rows: &mut [PlayerStanding]) {
    sort_and_rank(
        rows,
        |r| (r.wins as f64, r.win_pct),
        |r, rank| r.rank = rank,
    );
}

pub fn rank_groups(rows: &mut [GroupStanding]) {
    sort_and_rank(rows, |r| (r.avg_wins, r.win_pct), |r, rank| r.rank = rank);
}
