//! Balance simulator CLI.
//!
//! Runs automated playthroughs against the real game rules and prints
//! pacing statistics.
//!
//! Usage:
//!   cargo run -- [OPTIONS]
//!
//! Examples:
//!   cargo run                      # 100 runs to level 10
//!   cargo run -- -n 20 -l 5       # 20 runs to level 5
//!   cargo run -- --seed 42        # Reproducible run

use saga::simulator::{run_simulation, SimConfig};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    println!("Saga balance simulator");
    println!("  Runs:         {}", config.num_runs);
    println!("  Target level: {}", config.target_level);
    println!("  Max rounds:   {}", config.max_rounds);
    if let Some(seed) = config.seed {
        println!("  Seed:         {}", seed);
    }
    println!();

    let report = run_simulation(&config);
    println!("{}", report.to_text());
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(config.num_runs);
                    i += 1;
                }
            }
            "-l" | "--level" => {
                if i + 1 < args.len() {
                    config.target_level = args[i + 1].parse().unwrap_or(config.target_level);
                    i += 1;
                }
            }
            "-r" | "--max-rounds" => {
                if i + 1 < args.len() {
                    config.max_rounds = args[i + 1].parse().unwrap_or(config.max_rounds);
                    i += 1;
                }
            }
            "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }
    config
}

fn print_help() {
    println!("Usage: saga [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -n, --runs <N>        Number of simulation runs (default 100)");
    println!("  -l, --level <N>       Stop a run at this hero level (default 10)");
    println!("  -r, --max-rounds <N>  Combat round cap per run (default 200000)");
    println!("      --seed <N>        Seed for reproducible runs");
    println!("  -h, --help            Show this help");
}
