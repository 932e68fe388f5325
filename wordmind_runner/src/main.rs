use std::process::ExitCode;

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use wordmind::{Generator, Round};

const DEFAULT_TARGET: &str = "Ball";
const DEFAULT_MAX_TURNS: usize = 5000;

struct Args {
    target: String,
    max_turns: usize,
    seed: Option<u64>,
    no_length_peek: bool,
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        target: DEFAULT_TARGET.to_string(),
        max_turns: DEFAULT_MAX_TURNS,
        seed: None,
        no_length_peek: false,
        json: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--turns" => {
                let value = iter.next().ok_or("--turns needs a value")?;
                args.max_turns = value.parse().map_err(|_| "--turns needs a number")?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = Some(value.parse().map_err(|_| "--seed needs a number")?);
            }
            "--no-length-peek" => args.no_length_peek = true,
            "--json" => args.json = true,
            "--help" | "-h" => {
                return Err(format!(
                    "usage: wordmind_runner [TARGET] [--turns N] [--seed N] [--no-length-peek] [--json]\n\
                     defaults: TARGET={}, --turns {}",
                    DEFAULT_TARGET, DEFAULT_MAX_TURNS
                ));
            }
            other if !other.starts_with('-') => args.target = other.to_string(),
            other => return Err(format!("unknown flag: {}", other)),
        }
    }

    Ok(args)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let generator = Generator::new().allow_length_peek(!args.no_length_peek);
    let mut round = match Round::with_generator(&args.target, generator) {
        Ok(round) => round,
        Err(error) => {
            eprintln!("could not start a round: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!("guessing \"{}\"", round.target());
    round.start_guessing();

    while round.guessing_in_process() && round.guess_count() < args.max_turns as u64 {
        if let Some(report) = round.frame(&mut rng) {
            debug!(
                "#{}: {} (reward {}, correct {}, misplaced {}, absent {})",
                report.guess_count,
                report.word,
                report.reward,
                report.feedback.correct_positions.len(),
                report.feedback.wrong_positions.len(),
                report.feedback.absent_letters.len(),
            );
        }
    }

    let summary = round.summary();
    if summary.solved {
        info!(
            "solved \"{}\" in {} guesses",
            summary.target, summary.guess_count
        );
    } else {
        warn!(
            "gave up on \"{}\" after {} guesses",
            summary.target, summary.guess_count
        );
    }

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("could not serialize summary: {}", error);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "target: {}\nguesses: {}\nsolved: {}\nbest reward: {}",
            summary.target, summary.guess_count, summary.solved, summary.best_reward
        );
        if let Some(word) = &summary.final_guess {
            println!("final guess: {}", word);
        }
    }

    ExitCode::SUCCESS
}
