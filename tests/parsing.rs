use std::fs;
use std::path::PathBuf;

use mcc_pickem::ingest::read_csv_str;
use mcc_pickem::parse::{parse_game_column, MatchIndex, PickSheet, Position, Roster};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn matches_fixture_parses_in_order() {
    let table = read_csv_str(&read_fixture("matches.csv")).expect("fixture should parse");
    let index = MatchIndex::from_table(&table);
    assert_eq!(index.len(), 6);

    let game_numbers: Vec<u32> = index.matches.iter().map(|m| m.game_number).collect();
    assert_eq!(game_numbers, vec![1, 2, 3, 4, 5, 6]);

    let first = index.get("1_11/5/2025_5:45 PM_1").expect("opener should index");
    assert_eq!(first.team1, "Hoffman");
    assert_eq!(first.team2, "Larson");
    assert_eq!(first.winner.as_deref(), Some("Hoffman"));
    assert!(first.date_parsed().is_some());

    // Blank winner means undecided, not a loss for anyone.
    let open = index.get("3_11/19/2025_5:45 PM_1").expect("week 3 should index");
    assert!(!open.is_decided());
    assert!(open.key_matchup);
}

#[test]
fn game_column_headers_resolve_to_matches() {
    let header = "Week 2 | 11/12/2025 | 5:45 PM | Sheet 1";
    let col = parse_game_column(header).expect("header should match the pattern");
    assert_eq!(col.week, 2);
    assert_eq!(col.sheet, 1);
    assert_eq!(col.key, "2_11/12/2025_5:45 PM_1");

    let table = read_csv_str(&read_fixture("matches.csv")).unwrap();
    let index = MatchIndex::from_table(&table);
    let m = index.resolve(&col).expect("column should resolve");
    assert_eq!(m.game_number, 3);
    assert_eq!(m.winner.as_deref(), Some("Beck"));
}

#[test]
fn game_column_resolves_through_normalized_key_on_format_drift() {
    // Zero-padded date and time drift from the schedule sheet's formatting;
    // the composite string key misses but the numeric identity still joins.
    let col = parse_game_column("Week 2 | 11/12/2025 | 05:45 PM | Sheet 1")
        .expect("header should match the pattern");
    let table = read_csv_str(&read_fixture("matches.csv")).unwrap();
    let index = MatchIndex::from_table(&table);
    assert!(index.get(&col.key).is_none());
    let m = index.resolve(&col).expect("normalized key should join");
    assert_eq!(m.game_number, 3);
}

#[test]
fn non_game_headers_are_ignored() {
    assert!(parse_game_column("Your Name").is_none());
    assert!(parse_game_column("Anything else?").is_none());
    assert!(parse_game_column("Week 1 | short header").is_none());
}

#[test]
fn pick_sheet_keeps_schedule_column_order() {
    let table = read_csv_str(&read_fixture("picks.csv")).expect("fixture should parse");
    let sheet = PickSheet::from_table(&table);
    assert_eq!(sheet.name_column.as_deref(), Some("Your Name"));
    assert_eq!(sheet.columns.len(), 6);
    let weeks: Vec<u32> = sheet.columns.iter().map(|c| c.week).collect();
    assert_eq!(weeks, vec![1, 1, 2, 2, 3, 3]);

    assert_eq!(sheet.rows.len(), 5);
    assert_eq!(sheet.rows[0].name, "Ann Foster");
    // Blank cells stay blank rather than becoming empty-string picks.
    let eli = sheet.rows.iter().find(|r| r.name == "Eli Marsh").unwrap();
    assert_eq!(eli.picks[1], None);
    assert_eq!(eli.picks[0].as_deref(), Some("Hoffman"));
}

#[test]
fn malformed_week_is_tolerated_as_opaque() {
    let raw = "\
Week,Date,Time,Sheet,Team1_Skip,Team2_Skip,Winner
Playoffs,12/3/2025,7:45 PM,1,Hoffman,Beck,
";
    let table = read_csv_str(raw).unwrap();
    let index = MatchIndex::from_table(&table);
    let m = &index.matches[0];
    assert_eq!(m.week, None);
    assert_eq!(m.week_raw, "Playoffs");
    assert!(index.get("Playoffs_12/3/2025_7:45 PM_1").is_some());
}

#[test]
fn duplicate_match_key_keeps_last_row() {
    let raw = "\
Week,Date,Time,Sheet,Team1_Skip,Team2_Skip,Winner
1,11/5/2025,5:45 PM,1,Hoffman,Larson,Hoffman
1,11/5/2025,5:45 PM,1,Hoffman,Larson,Larson
";
    let table = read_csv_str(raw).unwrap();
    let index = MatchIndex::from_table(&table);
    let m = index.get("1_11/5/2025_5:45 PM_1").unwrap();
    assert_eq!(m.winner.as_deref(), Some("Larson"));
}

#[test]
fn roster_drops_empty_names_and_reads_positions() {
    let raw = "\
Name,Team,Position
Ann Foster,Hoffman,Lead
,Larson,Skip
  ,Beck,Vice
Ben Porter,Hoffman,Second
";
    let table = read_csv_str(raw).unwrap();
    let roster = Roster::from_table(&table);
    assert_eq!(roster.players.len(), 2);
    assert_eq!(roster.get("Ann Foster").unwrap().position, Some(Position::Lead));
    assert_eq!(roster.get("Ben Porter").unwrap().team.as_deref(), Some("Hoffman"));
}

#[test]
fn filter_menus_come_sorted() {
    let matches = read_csv_str(&read_fixture("matches.csv")).unwrap();
    let roster = read_csv_str(&read_fixture("roster.csv")).unwrap();
    let index = MatchIndex::from_table(&matches);
    let roster = Roster::from_table(&roster);

    assert_eq!(
        index.team_names(),
        vec!["Beck", "Hoffman", "Larson", "Whitfield"]
    );
    assert_eq!(
        roster.positions(),
        vec![Position::Vice, Position::Second, Position::Lead]
    );
    assert_eq!(index.weeks(), vec![1, 2, 3]);
    assert_eq!(index.latest_completed_week(), Some(2));
}
