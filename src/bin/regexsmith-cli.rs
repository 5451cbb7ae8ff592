//! Command-line front end for the regex synthesis engine.
//!
//! ```bash
//! regexsmith-cli "cat" "car" "cap" -n "dog" "bird"
//! regexsmith-cli --file examples.txt --validate --verbose
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use regexsmith::core::annealing::{AnnealingDriver, OptimizeConfig};
use regexsmith::core::fitness::{MultiCriteriaScorer, ScoringMode};
use regexsmith::core::scheduler::CoolingSchedule;
use regexsmith::core::validator;

#[derive(Parser)]
#[command(author, version, about = "Synthesize a regex from positive and negative examples", long_about = None)]
struct Cli {
    /// Strings the generated pattern should match.
    positive_examples: Vec<String>,

    /// Strings the generated pattern must NOT match.
    #[arg(short = 'n', long = "negative")]
    negative: Vec<String>,

    /// File containing positive examples, one per line.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// File containing negative examples, one per line.
    #[arg(long)]
    negative_file: Option<PathBuf>,

    /// Maximum allowed pattern complexity.
    #[arg(long, default_value_t = 50)]
    max_complexity: u64,

    /// Maximum annealing iterations.
    #[arg(long, default_value_t = 1000)]
    max_iterations: u32,

    /// Wall-clock timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Scoring weights preset.
    #[arg(long, value_enum, default_value_t = ScoringArg::Balanced)]
    scoring: ScoringArg,

    /// Random seed for reproducible results.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of independent restarts; the best-scoring result wins.
    #[arg(long, default_value_t = 1)]
    restarts: u32,

    /// Emit results as JSON instead of plain text.
    #[arg(long)]
    json: bool,

    /// Print progress information as the search runs.
    #[arg(short, long)]
    verbose: bool,

    /// Run full validation and a ReDoS safety check after optimization.
    #[arg(long)]
    validate: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ScoringArg {
    Minimal,
    Readable,
    Balanced,
}

impl From<ScoringArg> for ScoringMode {
    fn from(value: ScoringArg) -> ScoringMode {
        match value {
            ScoringArg::Minimal => ScoringMode::Minimal,
            ScoringArg::Readable => ScoringMode::Readable,
            ScoringArg::Balanced => ScoringMode::Balanced,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        println!("regexsmith {}", env!("CARGO_PKG_VERSION"));
    }

    let mut positives = cli.positive_examples.clone();
    if let Some(path) = &cli.file {
        match read_lines(path) {
            Ok(lines) => positives.extend(lines),
            Err(e) => {
                eprintln!("error reading {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }

    let mut negatives = cli.negative.clone();
    if let Some(path) = &cli.negative_file {
        match read_lines(path) {
            Ok(lines) => negatives.extend(lines),
            Err(e) => {
                eprintln!("error reading {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }

    if positives.is_empty() {
        eprintln!("error: no positive examples provided");
        eprintln!("provide examples as arguments or use --file");
        std::process::exit(1);
    }

    if cli.verbose {
        println!("positive examples: {}", positives.len());
        println!("negative examples: {}", negatives.len());
        println!("max complexity: {}", cli.max_complexity);
        println!("max iterations: {}", cli.max_iterations);
        println!("seed: {}", cli.seed);
        println!();
    }

    let config = OptimizeConfig {
        initial_temperature: 10.0,
        final_temperature: 0.01,
        max_iterations: cli.max_iterations,
        max_no_improvement: 150,
        cooling_schedule: CoolingSchedule::Adaptive,
        mutation_rate: 0.15,
        max_complexity: cli.max_complexity,
        seed: cli.seed,
        timeout: Some(Duration::from_secs(cli.timeout)),
    };

    let scorer = MultiCriteriaScorer::new(cli.scoring.into());
    let driver = AnnealingDriver::new(config);

    let outcome = if cli.restarts > 1 {
        driver.optimize_with_restarts(&positives, &negatives, &scorer, cli.restarts)
    } else {
        driver.optimize(&positives, &negatives, &scorer, None)
    };

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let regex_string = result.best_pattern.serialize();

    if cli.json {
        let json = serde_json::json!({
            "regex": regex_string,
            "score": result.best_fitness.total_score,
            "complexity": result.best_pattern.complexity(),
            "iterations": result.iterations,
            "time_seconds": result.time_seconds,
            "positive_matches": result.best_fitness.positive_matches,
            "positive_total": result.best_fitness.positive_total,
            "negative_matches": result.best_fitness.negative_matches,
            "negative_total": result.best_fitness.negative_total,
            "convergence_reason": result.convergence_label(),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap());
    } else {
        println!("{regex_string}");
    }

    if cli.validate {
        let record = validator::validate_default(&result.best_pattern, &positives, &negatives);
        let safety = validator::safety_analysis(&result.best_pattern);

        println!();
        println!(
            "validation: {} ({}/{} positive, {}/{} negative)",
            if record.is_valid { "pass" } else { "fail" },
            record.positive_matches.len(),
            positives.len(),
            negatives.len() - record.negative_matches.len(),
            negatives.len(),
        );
        println!("safety risk: {:?} (score {})", safety.risk_level, safety.risk_score);
        for warning in &safety.warnings {
            println!("  - {warning}");
        }
    }
}

fn read_lines(path: &PathBuf) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
