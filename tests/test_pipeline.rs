//! End-to-end pipeline tests against the published artifacts

use modelsweep::prelude::*;
use polars::prelude::*;
use std::fs::File;

fn spending_dataset(n: usize) -> Dataset {
    let hours: Vec<f64> = (0..n).map(|i| (i % 200) as f64 / 2.0).collect();
    let missions: Vec<f64> = (0..n).map(|i| ((i * 13) % 41) as f64).collect();
    let spent: Vec<f64> = hours
        .iter()
        .zip(missions.iter())
        .map(|(h, m)| 9.5 * h + 2.0 * m + 120.0)
        .collect();
    Dataset::new(
        df!(
            "hours_played" => hours,
            "missions_done" => missions,
            "total_spent" => spent
        )
        .unwrap(),
        "total_spent",
    )
    .unwrap()
}

fn two_feature_config() -> SweepConfig {
    SweepConfig::new(
        "total_spent",
        vec!["hours_played".to_string(), "missions_done".to_string()],
    )
    .with_max_subset_size(2)
    .with_test_fractions(vec![0.2])
}

#[test]
fn test_two_candidates_one_split_yields_three_models() {
    let dir = tempfile::tempdir().unwrap();
    let runner = SweepRunner::new(two_feature_config()).unwrap();
    let report = runner.run(&spending_dataset(1000), dir.path()).unwrap();

    // {hours}, {missions}, {hours,missions} under a single split
    assert_eq!(report.ranked.len(), 3);
    assert_eq!(report.metadata.total_models, 3);
    assert_eq!(report.n_skipped, 0);
}

#[test]
fn test_every_test_row_is_sampled_under_the_cap() {
    let dir = tempfile::tempdir().unwrap();
    let runner = SweepRunner::new(two_feature_config()).unwrap();
    let report = runner.run(&spending_dataset(1000), dir.path()).unwrap();

    // 200 test rows per model, cap 1000: all rows kept for all 3 models
    assert_eq!(report.n_records, 600);

    let frame = ParquetReader::new(File::open(&report.paths.predictions).unwrap())
        .finish()
        .unwrap();
    assert_eq!(frame.height(), 600);

    let per_model = frame
        .column("model_id")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .filter(|&id| id == 0)
        .count();
    assert_eq!(per_model, 200);
}

#[test]
fn test_prediction_table_carries_union_schema() {
    let dir = tempfile::tempdir().unwrap();
    let runner = SweepRunner::new(two_feature_config()).unwrap();
    let report = runner.run(&spending_dataset(500), dir.path()).unwrap();

    let frame = ParquetReader::new(File::open(&report.paths.predictions).unwrap())
        .finish()
        .unwrap();

    // 9 common + 2 coef + actual/predicted + 2 value
    assert_eq!(frame.width(), 15);
    for name in [
        "model_id",
        "features",
        "num_features",
        "train_size",
        "test_size",
        "mse",
        "rmse",
        "r2",
        "intercept",
        "coef_hours_played",
        "coef_missions_done",
        "actual",
        "predicted",
        "value_hours_played",
        "value_missions_done",
    ] {
        assert!(frame.column(name).is_ok(), "missing column {name}");
    }

    // Single-feature rows leave the other feature's columns null
    let num_features = frame.column("num_features").unwrap().i64().unwrap();
    let coef_missions = frame.column("coef_missions_done").unwrap().f64().unwrap();
    let features = frame.column("features").unwrap().str().unwrap();
    for row in 0..frame.height() {
        let uses_missions = features.get(row).unwrap().contains("missions_done");
        assert_eq!(coef_missions.get(row).is_some(), uses_missions);
        if num_features.get(row) == Some(2) {
            assert!(coef_missions.get(row).is_some());
        }
    }
}

#[test]
fn test_best_model_recovers_generating_function() {
    let dir = tempfile::tempdir().unwrap();
    let runner = SweepRunner::new(two_feature_config()).unwrap();
    let report = runner.run(&spending_dataset(1000), dir.path()).unwrap();

    let best = report.ranked.best().unwrap();
    assert_eq!(best.feature_list(), "hours_played,missions_done");
    assert!(best.r2 > 0.9999);
    assert!(best.rmse < 1.0);

    // Standardized coefficients are positive for both positive-weight features
    assert!(best.coefficients.iter().all(|&c| c > 0.0));
}

#[test]
fn test_top_models_document_matches_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let config = two_feature_config().with_top_n(2);
    let runner = SweepRunner::new(config).unwrap();
    let report = runner.run(&spending_dataset(400), dir.path()).unwrap();

    let text = std::fs::read_to_string(&report.paths.top_models).unwrap();
    let document: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(document["target"], "total_spent");
    let models = document["top_models"].as_array().unwrap();
    assert_eq!(models.len(), 2);

    let best = report.ranked.best().unwrap();
    assert_eq!(
        models[0]["r2"].as_f64().unwrap().to_bits(),
        best.r2.to_bits()
    );
    assert_eq!(document["metadata"]["total_models"], 3);
    assert_eq!(document["metadata"]["max_points_per_model"], 1000);
}

#[test]
fn test_repeated_runs_publish_identical_predictions() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let dataset = spending_dataset(600);

    let runner = SweepRunner::new(two_feature_config()).unwrap();
    let first = runner.run(&dataset, first_dir.path()).unwrap();
    let second = runner.run(&dataset, second_dir.path()).unwrap();

    let frame_a = ParquetReader::new(File::open(&first.paths.predictions).unwrap())
        .finish()
        .unwrap();
    let frame_b = ParquetReader::new(File::open(&second.paths.predictions).unwrap())
        .finish()
        .unwrap();

    assert_eq!(frame_a.height(), frame_b.height());
    let predicted_a = frame_a.column("predicted").unwrap().f64().unwrap();
    let predicted_b = frame_b.column("predicted").unwrap().f64().unwrap();
    for row in 0..frame_a.height() {
        assert_eq!(
            predicted_a.get(row).unwrap().to_bits(),
            predicted_b.get(row).unwrap().to_bits()
        );
    }
}

#[test]
fn test_missing_feature_column_fails_before_any_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("store");
    let config = SweepConfig::new(
        "total_spent",
        vec!["hours_played".to_string(), "no_such_column".to_string()],
    )
    .with_test_fractions(vec![0.2])
    .with_fail_fast(true);

    let runner = SweepRunner::new(config).unwrap();
    let result = runner.run(&spending_dataset(100), &out);

    assert!(result.is_err());
    assert!(!out.join("model_results.parquet").exists());
}
