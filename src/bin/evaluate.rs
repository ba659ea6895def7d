use std::time::Instant;

use pitycalc::evaluate::evaluate_report;
use pitycalc::simulation::save_statistics;
use pitycalc::{PityState, RateModel};

struct Args {
    banner: String,
    pity: u32,
    four_pity: u32,
    guaranteed: bool,
    target: u32,
    budget: u32,
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
    let mut budget = 0u32;
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
            "--budget" => {
                i += 1;
                budget = parse_value(&args, i, "--budget");
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
                    "Usage: pitycalc-evaluate [--banner character|weapon] [--pity N] [--four-pity N] [--guaranteed] [--target N] [--budget N] [--trials N] [--seed S] [--output FILE]"
                );
                println!();
                println!("Options:");
                println!("  --banner NAME   Banner track: character or weapon (default: character)");
                println!("  --pity N        Pulls since the last 5-star (default: 0)");
                println!("  --four-pity N   Pulls since the last 4-star (default: 0)");
                println!("  --guaranteed    The next 5-star is guaranteed featured");
                println!("  --target N      Featured copies wanted (default: 1)");
                println!("  --budget N      Pulls available (default: 0)");
                println!("  --trials N      Monte-Carlo trials (default: 5000, env PITYCALC_TRIALS)");
                println!("  --seed S        RNG seed (default: 42)");
                println!("  --output FILE   Write the full JSON report to FILE");
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
        budget,
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

    println!("Pity Evaluation ({} banner)", args.banner);
    println!(
        "  Pity:        {} / {}{}",
        args.pity,
        rate.hard_pity,
        if args.guaranteed { " (guaranteed)" } else { "" }
    );
    println!(
        "  Request:     {} cop{} within {} pulls",
        args.target,
        if args.target == 1 { "y" } else { "ies" },
        args.budget
    );
    println!("  Trials:      {} ({} threads)", args.trials, num_threads);
    println!();

    let start = Instant::now();
    let report = match evaluate_report(&state, &rate, args.target, args.budget, args.trials, args.seed)
    {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    let stats = &report.stats;
    println!("Results:");
    println!("  Success rate:    {:.1}%", stats.success_rate);
    println!("  Expected copies: {:.2}", stats.expected_copies);
    if stats.missing_pulls > 0.0 {
        println!("  Missing pulls:   {:.0} beyond budget (mean case)", stats.missing_pulls);
    }
    println!("  Guaranteed by:   {} pulls (worst case)", stats.worst_case);
    println!(
        "  4-star drops:    {:.1} expected ({:.1} featured)",
        stats.four_star_count, stats.featured_four_star_count
    );
    println!();
    println!("  Elapsed:     {:.1} ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(ref path) = args.output {
        if let Err(err) = save_statistics(&report, path) {
            eprintln!("Failed to write {}: {}", path, err);
            std::process::exit(1);
        }
        println!("  Report:      {}", path);
    }
}
