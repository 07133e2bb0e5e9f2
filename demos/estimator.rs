use adaptive_hyperloglog::{CardinalityEstimator, Config, Error, Precision};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

fn random_string(rng: impl Rng) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn main() -> Result<(), Error> {
    let mut rng = thread_rng();
    for cardinality in [1_000, 10_000, 100_000, 1_000_000, 10_000_000] {
        let precision = Precision::for_cardinality(cardinality);
        let mut estimator: CardinalityEstimator =
            Config::new(precision.get()).build()?;
        for _ in 0..cardinality {
            estimator.insert(&random_string(&mut rng));
        }
        let estimate = estimator.estimate();
        println!(
            "precision = {}, mode = {:?}, true = {}, estimate = {:.0}, relative error = {:.4}",
            precision,
            estimator.mode(),
            cardinality,
            estimate,
            (estimate - cardinality as f64).abs() / cardinality as f64
        );
    }
    Ok(())
}
