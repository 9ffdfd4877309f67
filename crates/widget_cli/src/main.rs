//! Terminal driver for the chess widget.
//!
//! Spawns the configured UCI engine, shows the optional ratings panel and
//! featured-game link, then plays from stdin: moves as `e2e4` (promotions
//! auto-queen), `new` to restart, `color white|black` to switch seats,
//! `quit` to leave.

mod text_board;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::{bail, Result};

use text_board::TextBoard;
use widget_core::{
    featured_game_url, fetch_ratings, ChessRules, Color, DropOutcome, EngineTransport,
    ProcessTransport, Session, WidgetConfig,
};

fn print_usage() {
    println!("chess-widget terminal driver");
    println!();
    println!("Usage:");
    println!("  widget_cli [--config FILE] [--engine PATH] [--color white|black]");
    println!();
    println!("In game: moves as e2e4, `new`, `color white|black`, `quit`");
}

fn load_config() -> Result<WidgetConfig> {
    let args: Vec<String> = env::args().skip(1).collect();

    // a config file is applied first so the flags can override it
    let mut config = WidgetConfig::default();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--config" {
            let Some(path) = args.get(i + 1) else {
                bail!("--config needs a file path");
            };
            config = WidgetConfig::load(Path::new(path))?;
        }
        i += 1;
    }

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 1,
            "--engine" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--engine needs a path");
                };
                config.engine_path = PathBuf::from(path);
                i += 1;
            }
            "--color" => {
                config.player_color = match args.get(i + 1).map(String::as_str) {
                    Some("white") => Color::White,
                    Some("black") => Color::Black,
                    other => bail!("--color needs white or black, got {other:?}"),
                };
                i += 1;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                bail!("unknown argument");
            }
        }
        i += 1;
    }
    Ok(config)
}

fn show_profile_panels(config: &WidgetConfig) {
    if let Some(id) = &config.featured_game {
        println!("Featured game: {}", featured_game_url(id));
    }
    if let Some(user) = &config.profile_user {
        match fetch_ratings(user) {
            Ok(ratings) if !ratings.is_empty() => {
                println!("Ratings for {user}:");
                for (label, value) in ratings.entries() {
                    println!("  {label}: {value}");
                }
            }
            Ok(_) => {}
            // panel stays hidden; the reason is only interesting for debugging
            Err(err) => log::debug!("ratings unavailable: {err}"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let config = load_config()?;

    show_profile_panels(&config);

    let mut engine_lines: Option<Receiver<String>> = None;
    let transport = ProcessTransport::spawn(&config.engine_path).map(|(transport, lines)| {
        engine_lines = Some(lines);
        Box::new(transport) as Box<dyn EngineTransport>
    });

    let search_delay = Duration::from_millis(config.search_delay_ms);
    let mut session = Session::builder(config)
        .rules(Box::new(ChessRules::new()))
        .board(Box::new(TextBoard::new()))
        .build()?;
    session.start_engine(transport);
    session.new_game();

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();
    let mut last_status = String::new();

    loop {
        let status = session.status().to_string();
        if status != last_status {
            if !status.is_empty() {
                println!("[{status}]");
            }
            last_status = status;
        }
        if session.is_game_over() {
            println!("Game over.");
            break;
        }

        if session.is_human_turn() || session.engine_phase().is_none() {
            print!("{} to move> ", session.turn());
            io::stdout().flush()?;
            let Some(line) = input.next() else { break };
            let line = line?;
            match line.trim() {
                "" => {}
                "quit" | "exit" => break,
                "new" => session.new_game(),
                "color white" => session.set_player_color(Color::White),
                "color black" => session.set_player_color(Color::Black),
                mv if mv.is_ascii() && (4..=5).contains(&mv.len()) => {
                    match session.on_drop(&mv[0..2], &mv[2..4]) {
                        DropOutcome::Accepted => {
                            // breathe before handing the position over
                            std::thread::sleep(search_delay);
                            session.on_snap_end();
                        }
                        DropOutcome::Snapback => println!("Illegal move."),
                    }
                }
                _ => println!("Commands: e2e4, new, color white|black, quit"),
            }
        } else {
            let Some(lines) = engine_lines.as_ref() else {
                println!("Engine unavailable, nobody plays this side.");
                break;
            };
            match lines.recv_timeout(Duration::from_secs(30)) {
                Ok(line) => session.on_engine_line(&line),
                Err(RecvTimeoutError::Timeout) => println!("[still waiting for the engine…]"),
                Err(RecvTimeoutError::Disconnected) => {
                    println!("Engine went away.");
                    break;
                }
            }
        }
    }

    session.dispose();
    Ok(())
}
