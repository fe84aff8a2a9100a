// Plays one session against a match coordinator over TCP
//
// Usage:
//   cargo run --bin client -- [options]
//
// Options:
//   --address <host>   Coordinator host (default: from config)
//   --port <port>      Coordinator port (default: from config)
//   --config <path>    Path to DeepBox.toml (default: DeepBox.toml)

use log::{error, info};
use std::env;
use std::process;

use deep_box::bot::Bot;
use deep_box::config::Config;
use deep_box::debug_logger::DebugLogger;

fn print_usage() {
    eprintln!("DeepBox Coordinator Client");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  client [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --address <host>   Coordinator host");
    eprintln!("  --port <port>      Coordinator port");
    eprintln!("  --config <path>    Path to DeepBox.toml (default: DeepBox.toml)");
    eprintln!("  --help             Show this help message");
}

#[tokio::main]
async fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut config_path = "DeepBox.toml".to_string();
    let mut address: Option<String> = None;
    let mut port: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match (args[i].as_str(), value) {
            ("--address", Some(v)) => address = Some(v),
            ("--port", Some(v)) => match v.parse::<u16>() {
                Ok(p) => port = Some(p),
                Err(e) => {
                    eprintln!("Error: Invalid port '{}': {}", v, e);
                    process::exit(1);
                }
            },
            ("--config", Some(v)) => config_path = v,
            (flag, _) => {
                eprintln!("Error: Unknown or incomplete option '{}'", flag);
                print_usage();
                process::exit(1);
            }
        }
        i += 2;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        Config::default_hardcoded()
    });

    let address = address.unwrap_or_else(|| config.server.coordinator_address.clone());
    let port = port.unwrap_or(config.server.coordinator_port);
    info!("Server address: {}", address);
    info!("Server port: {}", port);

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let bot = Bot::new(config).with_logger(logger);

    if let Err(e) = deep_box::client::run(&bot, &address, port).await {
        error!("{}", e);
        process::exit(1);
    }
}
