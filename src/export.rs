use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::aggregate::GroupStanding;
use crate::distribution::MatchDistribution;
use crate::model::Model;
use crate::pipeline::PlayerStanding;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct SnapshotFile<'a> {
    version: u32,
    generated_at: String,
    players: usize,
    games: usize,
    leaderboard: &'a [PlayerStanding],
    by_team: &'a [GroupStanding],
    by_position: &'a [GroupStanding],
    funk_eng_cup: &'a [PlayerStanding],
    distribution: Vec<&'a MatchDistribution>,
}

/// Write the derived model as versioned JSON, the dashboard's export surface.
pub fn write_snapshot(model: &Model, path: &Path) -> Result<()> {
    // Distribution sorted by game number so the file diffs cleanly.
    let mut distribution: Vec<&MatchDistribution> = model.distribution.values().collect();
    distribution.sort_by_key(|d| d.game_number);

    let snapshot = SnapshotFile {
        version: SNAPSHOT_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        players: model.leaderboard.len(),
        games: model.matches.len(),
        leaderboard: &model.leaderboard,
        by_team: &model.by_team,
        by_position: &model.by_position,
        funk_eng_cup: &model.funk_eng_cup,
        distribution,
    };

    let raw = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create export dir {}", parent.display()))?;
    }
    fs::write(path, raw).with_context(|| format!("write snapshot {}", path.display()))?;
    Ok(())
}
