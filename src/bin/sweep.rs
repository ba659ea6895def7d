use std::time::Instant;

use pitycalc::analytic::worst_case_pulls;
use pitycalc::simulation::save_statistics;
use pitycalc::{success_curve, PityState, RateModel};

struct Args {
    banner: String,
    pity: u32,
    four_pity: u32,
    guaranteed: bool,
    target: u32,
    max_budget: u32,
    step: u32,
    trials: u32,
    seed: u64,
    output: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut banner = "character".to_string();
    let mut pity = 0u32;
    let mut four_pity = 0u32;
    let mut guaranteed = false;
    let mut target = 1u32;
    let mut max_budget = 600u32;
    let mut step = 20u32;
    let mut trials = pitycalc::env_config::default_trials();
    let mut seed = 42u64;
    let mut output: Option<String> = None;

    fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
        args.get(i)
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| {
                eprintln!("Invalid or missing value for {}", flag);
                std::process::exit(1);
            })
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--banner" => {
                i += 1;
                banner = parse_value(&args, i, "--banner");
            }
            "--pity" => {
                i += 1;
                pity = parse_value(&args, i, "--pity");
            }
            "--four-pity" => {
                i += 1;
                four_pity = parse_value(&args, i, "--four-pity");
            }
            "--guaranteed" => {
                guaranteed = true;
            }
            "--target" => {
                i += 1;
                target = parse_value(&args, i, "--target");
            }
            "--max-budget" => {
                i += 1;
                max_budget = parse_value(&args, i, "--max-budget");
            }
            "--step" => {
                i += 1;
                step = parse_value(&args, i, "--step");
            }
            "--trials" => {
                i += 1;
                trials = parse_value(&args, i, "--trials");
            }
            "--seed" => {
                i += 1;
                seed = parse_value(&args, i, "--seed");
            }
            "--output" => {
                i += 1;
                output = Some(parse_value(&args, i, "--output"));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: pitycalc-sweep [--banner character|weapon] [--pity N] [--four-pity N] [--guaranteed] [--target N] [--max-budget N] [--step N] [--trials N] [--seed S] [--output FILE]"
                );
                println!();
                println!("Prints the success rate at every budget from 0 to --max-budget.");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        banner,
        pity,
        four_pity,
        guaranteed,
        target,
        max_budget,
        step,
        trials,
        seed,
        output,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();

    let rate = match args.banner.as_str() {
        "character" => RateModel::character(),
        "weapon" => RateModel::weapon(),
        other => {
            eprintln!("Unknown banner '{}'. Available: character, weapon", other);
            std::process::exit(1);
        }
    };
    let state = PityState::new(args.pity, args.four_pity, args.guaranteed);

    let num_threads = pitycalc::env_config::init_rayon_threads();

    println!(
        "Success sweep ({} banner, target {}, {} trials, {} threads)",
        args.banner, args.target, args.trials, num_threads
    );
    println!();

    let start = Instant::now();
    let curve = match success_curve(
        &state,
        &rate,
        args.target,
        args.max_budget,
        args.step,
        args.trials,
        args.seed,
    ) {
        Ok(curve) => curve,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    println!("  Budget   Success");
    for point in &curve {
        println!("  {:>6}   {:>6.1}%", point.pull_budget, point.success_rate);
    }
    println!();
    println!(
        "  Guaranteed at {} pulls (worst case)",
        worst_case_pulls(&state, &rate, args.target)
    );
    println!("  Elapsed: {:.1} ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(ref path) = args.output {
        if let Err(err) = save_statistics(&curve, path) {
            eprintln!("Failed to write {}: {}", path, err);
            std::process::exit(1);
        }
        println!("  Curve:   {}", path);
    }
}
