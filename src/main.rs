use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};

use mcc_pickem::ingest;
use mcc_pickem::model::{self, Model};
use mcc_pickem::pipeline::{PlayerStanding, Streak, StreakKind};
use mcc_pickem::similarity::GameFilter;

struct Args {
    matches_path: PathBuf,
    picks_path: PathBuf,
    roster_path: PathBuf,
    week: Option<u32>,
    similarity: Option<GameFilter>,
    overlay: HashMap<String, String>,
    export_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = parse_args()?;

    let matches = ingest::read_csv_file(&args.matches_path)?;
    let picks = ingest::read_csv_file(&args.picks_path)?;
    let roster = ingest::read_csv_file(&args.roster_path)?;
    println!(
        "[INFO] Loaded {} matches, {} pick rows, {} roster rows",
        matches.rows.len(),
        picks.rows.len(),
        roster.rows.len()
    );

    let model = model::build_model(&matches, &picks, &roster);

    if let Some(week) = args.week {
        println!("\nStandings through week {week}");
        print_standings(&model.as_of_week(Some(week)));
    } else {
        println!("\nCurrent standings");
        print_standings(&model.leaderboard);
    }

    if !args.overlay.is_empty() {
        let outcome = model.what_if(&args.overlay);
        println!("\nWhat-if standings ({} overlaid)", args.overlay.len());
        print_standings(&outcome.standings);
        for delta in &outcome.deltas {
            if delta.wins_delta != 0 || delta.losses_delta != 0 || delta.rank_delta != 0 {
                println!(
                    "  {}: {:+} W, {:+} L, {:+} rank",
                    delta.name, delta.wins_delta, delta.losses_delta, delta.rank_delta
                );
            }
        }
    }

    if let Some(filter) = &args.similarity {
        print_similarity(&model, filter);
    }

    print_groups(&model);
    print_distribution(&model);

    if let Some(path) = &args.export_path {
        mcc_pickem::export::write_snapshot(&model, path)?;
        println!("[INFO] Snapshot written to {}", path.display());
    }

    Ok(())
}

fn parse_args() -> Result<Args> {
    let env_path = |var: &str, fallback: &str| {
        PathBuf::from(std::env::var(var).unwrap_or_else(|_| fallback.to_string()))
    };
    let mut args = Args {
        matches_path: env_path("PICKEM_MATCHES_CSV", "data/matches.csv"),
        picks_path: env_path("PICKEM_PICKS_CSV", "data/picks.csv"),
        roster_path: env_path("PICKEM_ROSTER_CSV", "data/roster.csv"),
        week: None,
        similarity: None,
        overlay: HashMap::new(),
        export_path: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| anyhow!("{name} requires a value"))
        };
        match flag.as_str() {
            "--matches" => args.matches_path = PathBuf::from(value("--matches")?),
            "--picks" => args.picks_path = PathBuf::from(value("--picks")?),
            "--roster" => args.roster_path = PathBuf::from(value("--roster")?),
            "--week" => {
                let raw = value("--week")?;
                args.week = Some(raw.parse().with_context(|| format!("bad week '{raw}'"))?);
            }
            "--similarity" => {
                args.similarity = Some(parse_filter(&value("--similarity")?)?);
            }
            "--set-winner" => {
                let raw = value("--set-winner")?;
                let (key, team) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--set-winner expects GAME_KEY=TEAM"))?;
                args.overlay.insert(key.to_string(), team.to_string());
            }
            "--export" => args.export_path = Some(PathBuf::from(value("--export")?)),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown flag '{other}' (try --help)"),
        }
    }
    Ok(args)
}

fn parse_filter(raw: &str) -> Result<GameFilter> {
    if let Some(week) = raw.strip_prefix("week:") {
        return Ok(GameFilter::Week(
            week.parse().with_context(|| format!("bad week '{week}'"))?,
        ));
    }
    if let Some(team) = raw.strip_prefix("team:") {
        return Ok(GameFilter::Team(team.to_string()));
    }
    match raw {
        "all" => Ok(GameFilter::All),
        "decided" => Ok(GameFilter::Decided),
        "undecided" => Ok(GameFilter::Undecided),
        other => bail!("unknown similarity filter '{other}'"),
    }
}

fn print_usage() {
    println!("mcc_pickem — curling pick'em pool standings");
    println!();
    println!("  --matches PATH        matches csv (env PICKEM_MATCHES_CSV)");
    println!("  --picks PATH          picks csv (env PICKEM_PICKS_CSV)");
    println!("  --roster PATH         roster csv (env PICKEM_ROSTER_CSV)");
    println!("  --week W              standings as of end of week W");
    println!("  --similarity FILTER   all | decided | undecided | week:N | team:NAME");
    println!("  --set-winner KEY=TEAM overlay a winner (repeatable)");
    println!("  --export PATH         write the derived model as JSON");
}

fn print_standings(rows: &[PlayerStanding]) {
    println!(
        "{:>4}  {:<24} {:>3} {:>3}  {:>6}  {:<6} {}",
        "Rank", "Player", "W", "L", "Pct", "Form", "Streak"
    );
    for p in rows {
        let form: String = p.recent_form.iter().map(|o| o.letter()).collect();
        println!(
            "{:>4}  {:<24} {:>3} {:>3}  {:>5.1}%  {:<6} {}",
            p.rank,
            p.name,
            p.wins,
            p.losses,
            p.win_pct,
            form,
            streak_label(p.current_streak.as_ref()),
        );
    }
}

fn streak_label(streak: Option<&Streak>) -> String {
    match streak {
        Some(s) => {
            let letter = match s.kind {
                StreakKind::Win => "W",
                StreakKind::Loss => "L",
            };
            format!("{letter}{}", s.count)
        }
        None => "-".to_string(),
    }
}

fn print_groups(model: &Model) {
    println!("\nBy team");
    for g in &model.by_team {
        println!(
            "{:>4}  {:<24} {:>4.1}-{:<4.1}  {:>5.1}%  ({} players)",
            g.rank, g.name, g.avg_wins, g.avg_losses, g.win_pct, g.player_count
        );
    }
    println!("\nBy position");
    for g in &model.by_position {
        println!(
            "{:>4}  {:<24} {:>4.1}-{:<4.1}  {:>5.1}%  ({} players)",
            g.rank, g.name, g.avg_wins, g.avg_losses, g.win_pct, g.player_count
        );
    }
    if !model.funk_eng_cup.is_empty() {
        println!("\nFunk-Eng Cup (Leads & Seconds)");
        print_standings(&model.funk_eng_cup);
    }
}

fn print_distribution(model: &Model) {
    println!("\nPick distribution");
    let mut rows: Vec<_> = model.distribution.values().collect();
    rows.sort_by_key(|d| d.game_number);
    for d in rows {
        // Presentation default for the tie case; the model keeps chalk empty.
        let chalk = d.chalk.as_deref().unwrap_or("(split)");
        println!(
            "  #{:<3} {} {}% vs {} {}%  chalk: {}",
            d.game_number, d.team1, d.team1_pct, d.team2, d.team2_pct, chalk
        );
    }
    if let Some(next) = model.next_upcoming_date() {
        println!("\nNext draw: {next}");
    }
}

fn print_similarity(model: &Model, filter: &GameFilter) {
    let matrix = model.similarity(filter);
    println!("\nPick similarity");
    for row in &matrix {
        for cell in row {
            if cell.is_self || cell.player1 >= cell.player2 {
                continue;
            }
            println!(
                "  {} ~ {}: {}% ({}/{} games, {} differ)",
                cell.player1,
                cell.player2,
                cell.similarity,
                cell.matching_games,
                cell.total_games,
                cell.differences.len()
            );
        }
    }
}
