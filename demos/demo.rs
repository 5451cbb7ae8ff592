use regexsmith::core::annealing::{AnnealingDriver, OptimizeConfig};
use regexsmith::core::fitness::{MultiCriteriaScorer, ScoringMode};
use regexsmith::core::validator;

fn run_example(title: &str, positives: &[&str], negatives: &[&str]) {
    let positives: Vec<String> = positives.iter().map(|s| s.to_string()).collect();
    let negatives: Vec<String> = negatives.iter().map(|s| s.to_string()).collect();

    let config = OptimizeConfig {
        seed: 7,
        max_iterations: 400,
        max_no_improvement: 120,
        ..OptimizeConfig::default()
    };
    let driver = AnnealingDriver::new(config);
    let scorer = MultiCriteriaScorer::new(ScoringMode::Balanced);

    let result = driver.optimize(&positives, &negatives, &scorer, None).expect("non-empty positives with a valid config");
    let regex_string = result.best_pattern.serialize();
    let safety = validator::safety_analysis(&result.best_pattern);

    println!("{title}");
    println!("  positives: {:?}", positives);
    println!("  negatives: {:?}", negatives);
    println!("  pattern:   {regex_string}");
    println!(
        "  score:     {:.3} ({} iterations, {:?} convergence)",
        result.best_fitness.total_score, result.iterations, result.convergence_reason
    );
    println!("  safety:    {:?}\n", safety.risk_level);
}

fn main() {
    println!("=== regexsmith synthesis walkthrough ===\n");

    run_example("digits", &["123", "456", "789", "0"], &["abc", "12a"]);

    run_example(
        "ids with a length cap",
        &["AB12", "XY99", "QR01"],
        &["AB123", "A1"],
    );

    run_example(
        "email-like domain class",
        &["user@example.com", "a@b.org", "foo@bar.net"],
        &["not-an-email", "user@"],
    );
}
