#![deny(warnings)]

//! Headless CLI: load a league, build and simulate its season, print the
//! results and the table, and optionally save a snapshot.

use anyhow::{bail, Result};
use season_config::{demo_league, load_league};
use season_runtime::Season;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    league: Option<String>,
    seed: Option<u64>,
    out: Option<String>,
    bincode: bool,
    version: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--league" => args.league = it.next(),
            "--seed" => {
                let Some(raw) = it.next() else {
                    bail!("--seed needs a value");
                };
                args.seed = Some(raw.parse()?);
            }
            "--out" => args.out = it.next(),
            "--bincode" => args.bincode = true,
            "--version" => args.version = true,
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args()?;
    if args.version {
        println!(
            "cli {} ({} built {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(league = ?args.league, seed = ?args.seed, "starting CLI");

    let league = match &args.league {
        Some(path) => load_league(path)?,
        None => demo_league()?,
    };
    let seed = args.seed.unwrap_or(league.seed);
    let mut season = Season::new(league.options, league.teams, seed)?;
    let simulated = season.simulate_all()?;

    let state = season.state();
    println!(
        "{} | format: {} | teams: {} | matches: {} | seed: {}",
        state.options.league_name,
        state.options.format,
        state.teams.len(),
        simulated,
        state.seed
    );
    for summary in season.summaries() {
        println!("{summary}");
    }
    if let Some(end) = state.end {
        println!("Season ends {}", end.format("%a %Y-%m-%d %H:%M"));
    }

    println!();
    println!(
        "{:<4} {:<24} {:>3} {:>3} {:>3} {:>3} {:>6} {:>5} {:>4}",
        "#", "Team", "P", "W", "D", "L", "Diff", "Pts", "F"
    );
    for (rank, row) in season.standings().iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>3} {:>3} {:>3} {:>3} {:>6} {:>5} {:>4}",
            rank + 1,
            row.team.as_str(),
            row.played,
            row.wins,
            row.draws,
            row.losses,
            row.score_difference(),
            row.points(),
            row.fouls
        );
    }

    if let Some(out) = &args.out {
        if args.bincode {
            persistence::save_bincode(out, season.state())?;
        } else {
            persistence::save_json(out, season.state())?;
        }
        println!("Snapshot saved to {out}");
    } else if args.bincode {
        let bytes = persistence::to_bytes(season.state())?;
        println!("Snapshot size: {} bytes (bincode, not saved)", bytes.len());
    }

    Ok(())
}
