// Standalone replay tool for analyzing DeepBox debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate             Run validation mode with expected moves
//   --strategy <name>      Strategy to replay with (default: from config)
//   --turn-time <ms>       Turn time for MCTS strategies (default: from config)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to DeepBox.toml (default: DeepBox.toml)

use std::env;
use std::process;
use std::time::{Duration, Instant};

use deep_box::board::Edge;
use deep_box::config::Config;
use deep_box::replay::ReplayEngine;
use deep_box::simple_profiler;
use deep_box::strategy::Strategy;

fn print_usage() {
    eprintln!("DeepBox Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:E,...>    Validate expected edges (format: turn:edge,...)");
    eprintln!("  --strategy <name>       random, first_box_completing, always4_never3,");
    eprintln!("                          monte_carlo, alpha_beta or deep_box");
    eprintln!("  --turn-time <ms>        Turn time given to the strategy");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to DeepBox.toml (default: DeepBox.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all turns");
    eprintln!("  replay deepbox_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific turns with alpha-beta");
    eprintln!("  replay deepbox_debug.jsonl --turns 5,10,15 --strategy alpha_beta");
    eprintln!();
    eprintln!("  # Validate expected edges (alternatives separated by '|')");
    eprintln!("  replay deepbox_debug.jsonl --validate 5:17,10:8|0");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<Edge>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'turn:edge'", pair));
            }

            let turn = parts[0]
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", parts[0], e))?;

            let edges: Result<Vec<Edge>, String> = parts[1]
                .split('|')
                .map(|m| {
                    m.trim()
                        .parse::<Edge>()
                        .map_err(|e| format!("Invalid edge '{}': {}", m, e))
                })
                .collect();

            Ok((turn, edges?))
        })
        .collect()
}

/// Value following a flag, or exit with an error
fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

enum Mode {
    All,
    Turns(String),
    Validate(String),
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "DeepBox.toml".to_string();
    let mut verbose = false;
    let mut mode = None;
    let mut strategy: Option<Strategy> = None;
    let mut turn_time: Option<Duration> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(Mode::All);
            }
            "--turns" => {
                mode = Some(Mode::Turns(flag_value(&args, i, "--turns").to_string()));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(flag_value(&args, i, "--validate").to_string()));
                i += 1;
            }
            "--strategy" => {
                match flag_value(&args, i, "--strategy").parse::<Strategy>() {
                    Ok(s) => strategy = Some(s),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--turn-time" => {
                match flag_value(&args, i, "--turn-time").parse::<u64>() {
                    Ok(ms) if ms > 0 => turn_time = Some(Duration::from_millis(ms)),
                    _ => {
                        eprintln!("Error: --turn-time must be a positive number of milliseconds");
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--config" => {
                config_path = flag_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --turns, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let mut engine = ReplayEngine::new(config, verbose);
    if let Some(strategy) = strategy {
        engine = engine.with_strategy(strategy);
    }
    if let Some(turn_time) = turn_time {
        engine = engine.with_turn_time(turn_time);
    }

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    simple_profiler::reset();
    let start_time = Instant::now();

    match mode {
        Mode::All => {
            println!("Replaying all {} turns...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turn_arg) => {
            let turns = match parse_turns(&turn_arg) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error parsing turns: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&entries, &turns) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(validate_arg) => {
            let expected_moves = match parse_expected_moves(&validate_arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected moves: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }

    simple_profiler::print_report(start_time.elapsed().as_millis() as u64);
}
