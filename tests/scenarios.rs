use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use mcc_pickem::export::write_snapshot;
use mcc_pickem::ingest::{read_csv_str, RawTable};
use mcc_pickem::model::{build_model, Model};
use mcc_pickem::similarity::GameFilter;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_model() -> Model {
    let matches = read_csv_str(&read_fixture("matches.csv")).unwrap();
    let picks = read_csv_str(&read_fixture("picks.csv")).unwrap();
    let roster = read_csv_str(&read_fixture("roster.csv")).unwrap();
    build_model(&matches, &picks, &roster)
}

fn tables(matches: &str, picks: &str) -> (RawTable, RawTable, RawTable) {
    (
        read_csv_str(matches).unwrap(),
        read_csv_str(picks).unwrap(),
        read_csv_str("Name,Team,Position\n").unwrap(),
    )
}

#[test]
fn what_if_swaps_the_lead() {
    // Pat and Quinn are tied 2-0; the open game splits them.
    let matches = "\
Week,Date,Time,Sheet,Team1_Skip,Team2_Skip,Winner
1,11/5/2025,5:45 PM,1,Alpha,Bravo,Alpha
2,11/12/2025,5:45 PM,1,Alpha,Bravo,Alpha
3,11/19/2025,5:45 PM,1,Alpha,Bravo,
";
    let picks = "\
Name,Week 1 | 11/5/2025 | 5:45 PM | Sheet 1,Week 2 | 11/12/2025 | 5:45 PM | Sheet 1,Week 3 | 11/19/2025 | 5:45 PM | Sheet 1
Pat,Alpha,Alpha,Alpha
Quinn,Alpha,Alpha,Bravo
";
    let (matches, picks, roster) = tables(matches, picks);
    let model = build_model(&matches, &picks, &roster);
    assert_eq!(model.leaderboard[0].rank, 1);
    assert_eq!(model.leaderboard[1].rank, 1);

    let overlay = HashMap::from([(
        "3_11/19/2025_5:45 PM_1".to_string(),
        "Alpha".to_string(),
    )]);
    let outcome = model.what_if(&overlay);

    let pat = outcome.standings.iter().find(|p| p.name == "Pat").unwrap();
    let quinn = outcome.standings.iter().find(|p| p.name == "Quinn").unwrap();
    assert_eq!((pat.wins, pat.losses, pat.rank), (3, 0, 1));
    assert_eq!((quinn.wins, quinn.losses, quinn.rank), (2, 1, 2));

    let pat_delta = outcome.deltas.iter().find(|d| d.name == "Pat").unwrap();
    assert_eq!((pat_delta.wins_delta, pat_delta.losses_delta, pat_delta.rank_delta), (1, 0, 0));
    let quinn_delta = outcome.deltas.iter().find(|d| d.name == "Quinn").unwrap();
    assert_eq!(
        (quinn_delta.wins_delta, quinn_delta.losses_delta, quinn_delta.rank_delta),
        (0, 1, 1)
    );

    // The baseline model is untouched.
    assert!(model.matches.get("3_11/19/2025_5:45 PM_1").unwrap().winner.is_none());
}

#[test]
fn empty_overlay_reproduces_the_baseline() {
    let model = fixture_model();
    let outcome = model.what_if(&HashMap::new());
    assert_eq!(outcome.standings, model.leaderboard);
    assert!(outcome
        .deltas
        .iter()
        .all(|d| d.wins_delta == 0 && d.losses_delta == 0 && d.rank_delta == 0));
}

#[test]
fn overlay_with_unknown_team_is_dropped() {
    let model = fixture_model();
    let overlay = HashMap::from([(
        "3_11/19/2025_5:45 PM_1".to_string(),
        "Nobody".to_string(),
    )]);
    let outcome = model.what_if(&overlay);
    assert_eq!(outcome.standings, model.leaderboard);
}

#[test]
fn overlaying_a_decided_match_takes_the_overlay_value() {
    let model = fixture_model();
    // Flip the opener from Hoffman to Larson.
    let overlay = HashMap::from([(
        "1_11/5/2025_5:45 PM_1".to_string(),
        "Larson".to_string(),
    )]);
    let outcome = model.what_if(&overlay);
    let ann = outcome.standings.iter().find(|p| p.name == "Ann Foster").unwrap();
    assert_eq!((ann.wins, ann.losses), (3, 1));
    let cal = outcome.standings.iter().find(|p| p.name == "Cal Reyes").unwrap();
    assert_eq!((cal.wins, cal.losses), (3, 1));
}

#[test]
fn as_of_week_truncates_later_results() {
    let model = fixture_model();

    let week1 = model.as_of_week(Some(1));
    let ann = week1.iter().find(|p| p.name == "Ann Foster").unwrap();
    assert_eq!((ann.wins, ann.losses), (2, 0));
    let cal = week1.iter().find(|p| p.name == "Cal Reyes").unwrap();
    assert_eq!((cal.wins, cal.losses), (1, 1));
    // Week 2+ games do not appear in anyone's history yet.
    assert!(week1.iter().all(|p| p.results.iter().all(|r| r.week == Some(1))));

    // None means the current table.
    assert_eq!(model.as_of_week(None), model.leaderboard);
}

#[test]
fn as_of_week_is_monotone_in_week() {
    let model = fixture_model();
    for (w1, w2) in [(1u32, 2u32), (2, 3)] {
        let early = model.as_of_week(Some(w1));
        let late = model.as_of_week(Some(w2));
        for p in &early {
            let then = late.iter().find(|q| q.name == p.name).unwrap();
            assert!(p.wins <= then.wins);
            assert!(p.losses <= then.losses);
        }
    }
}

#[test]
fn rank_trajectory_walks_every_week() {
    let model = fixture_model();
    let trajectory = model.rank_trajectory();
    let ann = &trajectory["Ann Foster"];
    assert_eq!(ann.len(), 3);
    assert_eq!(ann[0].week, 1);
    assert!(ann.iter().all(|point| point.rank == 1));

    let cal = &trajectory["Cal Reyes"];
    assert_eq!(cal[0].wins, 1);
    assert_eq!(cal[2].wins, 2);
}

#[test]
fn similarity_depends_on_the_game_filter() {
    // Identical on decided games, opposite on the open ones.
    let matches = "\
Week,Date,Time,Sheet,Team1_Skip,Team2_Skip,Winner
1,11/5/2025,5:45 PM,1,Alpha,Bravo,Alpha
2,11/12/2025,5:45 PM,1,Alpha,Bravo,
3,11/19/2025,5:45 PM,1,Alpha,Bravo,
";
    let picks = "\
Name,Week 1 | 11/5/2025 | 5:45 PM | Sheet 1,Week 2 | 11/12/2025 | 5:45 PM | Sheet 1,Week 3 | 11/19/2025 | 5:45 PM | Sheet 1
Pat,Alpha,Alpha,Alpha
Quinn,Alpha,Bravo,Bravo
";
    let (matches, picks, roster) = tables(matches, picks);
    let model = build_model(&matches, &picks, &roster);

    let decided = model.similarity(&GameFilter::Decided);
    assert_eq!(decided[0][1].similarity, 100);
    assert_eq!(decided[0][1].total_games, 1);
    assert!(decided[0][1].differences.is_empty());

    let all = model.similarity(&GameFilter::All);
    let cell = &all[0][1];
    assert_eq!(cell.similarity, 33);
    assert_eq!((cell.matching_games, cell.total_games), (1, 3));
    assert_eq!(cell.differences.len(), 2);
    assert_eq!(cell.differences[0].pick1, "Alpha");
    assert_eq!(cell.differences[0].pick2, "Bravo");

    let undecided = model.similarity(&GameFilter::Undecided);
    assert_eq!(undecided[0][1].similarity, 0);
}

#[test]
fn similarity_matrix_is_symmetric_with_tagged_diagonal() {
    let model = fixture_model();
    let matrix = model.similarity(&GameFilter::All);
    let n = model.leaderboard.len();
    assert_eq!(matrix.len(), n);

    for i in 0..n {
        assert!(matrix[i][i].is_self);
        assert_eq!(matrix[i][i].similarity, 100);
        for j in 0..n {
            assert_eq!(matrix[i][j].similarity, matrix[j][i].similarity);
            assert_eq!(matrix[i][j].matching_games, matrix[j][i].matching_games);
            assert_eq!(matrix[i][j].total_games, matrix[j][i].total_games);
        }
    }

    // A game only counts when both entrants picked it: Eli skipped two.
    let ann_eli = matrix[0]
        .iter()
        .find(|c| c.player2 == "Eli Marsh")
        .unwrap();
    assert_eq!(ann_eli.total_games, 4);
}

#[test]
fn week_and_team_filters_restrict_the_sample() {
    let model = fixture_model();

    let week1 = model.similarity(&GameFilter::Week(1));
    assert!(week1[0].iter().all(|c| c.total_games <= 2));

    // Hoffman appears in games 1, 3 and 5.
    let hoffman = model.similarity(&GameFilter::Team("Hoffman".to_string()));
    let cell = &hoffman[0][1];
    assert_eq!(cell.total_games, 3);
}

#[test]
fn upcoming_and_latest_date_groupings() {
    let model = fixture_model();
    assert_eq!(
        model.next_upcoming_date(),
        NaiveDate::from_ymd_opt(2025, 11, 19)
    );
    assert_eq!(
        model.latest_decided_date(),
        NaiveDate::from_ymd_opt(2025, 11, 12)
    );
    assert_eq!(model.upcoming_matches().len(), 2);
    assert_eq!(model.matches_on_latest_date().len(), 2);
}

#[test]
fn snapshot_export_writes_versioned_json() {
    let model = fixture_model();
    let path = std::env::temp_dir().join("mcc_pickem_snapshot_test.json");
    write_snapshot(&model, &path).expect("snapshot should write");

    let raw = fs::read_to_string(&path).expect("snapshot should read back");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("snapshot should be json");
    assert_eq!(value["version"], 1);
    assert_eq!(value["players"], 5);
    assert_eq!(value["games"], 6);
    assert_eq!(value["leaderboard"][0]["name"], "Ann Foster");
    assert_eq!(value["distribution"][0]["game_number"], 1);
    fs::remove_file(&path).ok();
}
