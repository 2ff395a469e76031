//! Compare games against a reference repertoire from the command line.
//!
//! Usage: cargo run --bin check-deviation -- <reference.pgn> <games.pgn> <player> [--black <black_reference.pgn>]
//!
//! With `--black`, games where the player has White are checked against
//! the first file and games where they have Black against the second.

use deviation_core::{parse_games_lenient, ChapterSource, Study};
use server::report::report_games;
use std::env;
use std::fs;

#[derive(Debug, PartialEq)]
struct Args {
    reference_path: String,
    games_path: String,
    player: String,
    black_path: Option<String>,
}

/// Arguments after the program name. `Err` carries the complaint to print
/// above the usage text.
fn parse_args(args: &[String]) -> Result<Args, Option<String>> {
    let [reference_path, games_path, player, rest @ ..] = args else {
        return Err(None);
    };

    let mut black_path = None;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--black" => match rest.get(i + 1) {
                Some(path) if !path.starts_with("--") => {
                    black_path = Some(path.clone());
                    i += 2;
                }
                _ => return Err(Some("--black needs a PGN file".to_string())),
            },
            other => return Err(Some(format!("Unknown argument: {other}"))),
        }
    }

    Ok(Args {
        reference_path: reference_path.clone(),
        games_path: games_path.clone(),
        player: player.clone(),
        black_path,
    })
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <reference.pgn> <games.pgn> <player> [--black <black_reference.pgn>]",
        program
    );
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("check-deviation", String::as_str);

    let Args {
        reference_path,
        games_path,
        player,
        black_path,
    } = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(complaint) => {
            if let Some(complaint) = complaint {
                eprintln!("{complaint}");
            }
            usage(program);
        }
    };

    let white = Study::from_pgn(&fs::read_to_string(&reference_path)?)?;
    let black = match &black_path {
        Some(path) => Some(Study::from_pgn(&fs::read_to_string(path)?)?),
        None => None,
    };
    let games = parse_games_lenient(&fs::read_to_string(&games_path)?)?;

    if white.is_empty() {
        eprintln!("No reference lines in {}", reference_path);
        std::process::exit(1);
    }

    let source = match &black {
        Some(black) => ChapterSource::ByColor {
            white: white.chapters(),
            black: black.chapters(),
        },
        None => ChapterSource::Combined(white.chapters()),
    };

    let reports = report_games(&source, &games, &player);
    for (n, report) in reports.iter().enumerate() {
        if reports.len() > 1 {
            println!("Game {}: {} vs {}", n + 1, report.white, report.black);
        }
        for line in report.lines() {
            println!("{line}");
        }
    }

    Ok(())
}
