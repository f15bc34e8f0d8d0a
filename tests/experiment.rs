use prnn::data::idx::{encode_idx_pair, MNIST_CLASSES};
use prnn::data::parse_idx_pair;
use prnn::{run_experiment, Dataset, ExperimentConfig, InputPolicy, PrnnError};

/// Deterministic stand-in for MNIST: `count` 4x4 "images" with labels 0..9.
fn synthetic(count: usize) -> Dataset {
    let inputs = (0..count)
        .map(|i| (0..16).map(|p| ((i * 7 + p * 3) % 256) as f64 / 255.0).collect())
        .collect();
    let labels = (0..count).map(|i| i % MNIST_CLASSES).collect();
    Dataset::new(inputs, labels).unwrap()
}

fn small_config() -> ExperimentConfig {
    ExperimentConfig {
        num_cells: 20,
        epochs: 2,
        train_limit: 25,
        test_limit: 12,
        log_every: 10,
        seed: Some(5),
        ..Default::default()
    }
}

#[test]
fn run_produces_consistent_report() {
    let (train, test) = (synthetic(40), synthetic(30));
    let report = run_experiment(&small_config(), &train, &test).unwrap();

    assert_eq!(report.epochs.len(), 2);
    assert!(report.epochs.iter().all(|e| e.steps == 25));
    assert_eq!(report.evaluation.total, 12);
    assert_eq!(report.evaluation.predictions.len(), 12);
    assert!(report.evaluation.predictions.iter().all(|&p| p < 20));
    assert!((0.0..=1.0).contains(&report.evaluation.accuracy));
    assert_eq!(
        report.evaluation.accuracy,
        report.evaluation.correct as f64 / report.evaluation.total as f64
    );
    assert_eq!(report.evaluation.confusion.correct(), report.evaluation.correct);
}

#[test]
fn seeded_runs_are_reproducible() {
    let (train, test) = (synthetic(40), synthetic(30));
    let a = run_experiment(&small_config(), &train, &test).unwrap();
    let b = run_experiment(&small_config(), &train, &test).unwrap();
    assert_eq!(a.edge_count, b.edge_count);
    assert_eq!(a.evaluation.predictions, b.evaluation.predictions);
    assert_eq!(a.epochs[1].mean_loss, b.epochs[1].mean_loss);
}

#[test]
fn strict_policy_rejects_wide_inputs() {
    let config = ExperimentConfig {
        num_cells: 10,
        input_policy: InputPolicy::Strict,
        ..small_config()
    };
    let err = run_experiment(&config, &synthetic(5), &synthetic(5)).unwrap_err();
    assert!(matches!(err, PrnnError::InvalidArgument(_)));
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let config = ExperimentConfig { num_cells: 4, ..small_config() };
    assert!(run_experiment(&config, &synthetic(5), &synthetic(5)).is_err());
}

#[test]
fn idx_bytes_feed_the_experiment() {
    let (images, labels) = encode_idx_pair(&synthetic(20), 4, 4).unwrap();
    let parsed = parse_idx_pair(&images, &labels, MNIST_CLASSES).unwrap();
    assert_eq!(parsed.len(), 20);
    assert_eq!(parsed.feature_count(), 16);

    let report = run_experiment(&small_config(), &parsed, &parsed).unwrap();
    assert_eq!(report.evaluation.total, 12);
}

#[test]
fn report_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let report = run_experiment(&small_config(), &synthetic(30), &synthetic(30)).unwrap();
    report.save_json(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["config"]["num_cells"], 20);
    assert_eq!(value["epochs"].as_array().unwrap().len(), 2);
    assert_eq!(value["evaluation"]["total"], 12);
}
