use std::path::PathBuf;
use std::process;

use log::info;

mod bootstrap;
mod sim;

use sim::RunnerConfig;

fn print_help() {
    eprintln!(
        r#"Agora Runner - scripted village economy simulation

USAGE:
    agora-runner [OPTIONS]

OPTIONS:
    --config <PATH>     Load runner configuration from JSON file
    --snapshot <PATH>   Write a market snapshot to this file at the end
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run the default seven-day week
    agora-runner

    # Run with a custom economy
    agora-runner --config village.json

    # Keep the closing books
    agora-runner --snapshot week.json
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut snapshot_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return;
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--snapshot" | "-s" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --snapshot requires a path argument");
                    process::exit(1);
                }
                snapshot_path = Some(PathBuf::from(&args[i]));
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            match RunnerConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}", e);
                    process::exit(1);
                }
            }
        }
        None => RunnerConfig::default(),
    };

    info!("Starting the week: days={}", config.days);
    if let Err(e) = sim::run(config, snapshot_path.as_deref()) {
        eprintln!("Simulation failed: {}", e);
        process::exit(1);
    }
}
