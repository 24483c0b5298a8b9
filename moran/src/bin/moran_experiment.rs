//! Moran Process Experiment Runner
//!
//! Runs a batch of Moran processes from a TOML description and reports how
//! often each strategy took over the population.
//!
//! Usage:
//!   cargo run --release --bin moran_experiment -- experiments/cooperators_vs_defector.toml

use moran::{run_experiment, ExperimentConfig};
use std::env;
use std::fs;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <experiment.toml>", args[0]);
        std::process::exit(1);
    }

    let config_path = &args[1];
    let config_str = fs::read_to_string(config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config = ExperimentConfig::from_toml_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing experiment: {}", e);
        std::process::exit(1);
    });

    println!("Moran Process Experiment");
    println!("========================\n");
    println!("Parameters:");
    println!("  Runs: {}", config.runs);
    println!("  Base seed: {}", config.seed);
    println!("  Turns per match: {}", config.process.turns);
    println!("  Noise: {}", config.process.noise);
    println!("  Mutation rate: {}", config.process.mutation_rate);
    match config.process.max_generations {
        Some(limit) => println!("  Max generations: {}", limit),
        None => println!("  Max generations: unbounded"),
    }
    println!("\nStarting population:");
    for entry in &config.population {
        println!("  {} x {}", entry.count, entry.strategy);
    }
    println!();

    let summary = run_experiment(&config).unwrap_or_else(|e| {
        eprintln!("Experiment failed: {}", e);
        std::process::exit(1);
    });

    println!("Fixation Results:");
    println!("-----------------");
    let mut winners: Vec<(&String, &usize)> = summary.fixations.iter().collect();
    winners.sort_by(|a, b| b.1.cmp(a.1));
    for (strategy, count) in winners {
        println!(
            "  {}: {} runs ({:.1}%)",
            strategy,
            count,
            summary.fixation_probability(strategy) * 100.0
        );
    }
    if summary.unresolved > 0 {
        println!("  No fixation (ceiling reached): {} runs", summary.unresolved);
    }
    println!("\nMean generations to termination: {:.2}", summary.mean_generations());
}
