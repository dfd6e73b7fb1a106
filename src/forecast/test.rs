use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;

use crate::forecast::{
    BaselinePredictor, FeatureBuilder, FlowPredictor, ForecastCache, ForecastError, ForecastKey,
    ForecastTable, LinearPredictor, PredictorError,
};
use crate::util::fixtures::{
    fixture_path, line_graph, ConstantPredictor, FailingPredictor, ScriptedPredictor, CAMPUS,
};
use crate::graph::Graph;

fn key(hour: f64) -> ForecastKey {
    ForecastKey::new(hour, 1, true).unwrap()
}

#[test]
fn keys_compare_exactly() {
    assert_eq!(key(9.0), key(9.0));
    assert_ne!(key(9.0), key(9.000_000_001));
    assert_ne!(key(9.0), ForecastKey::new(9.0, 2, true).unwrap());
    assert_ne!(key(9.0), ForecastKey::new(9.0, 1, false).unwrap());
    assert_eq!(key(-0.0), key(0.0));

    let distinct = [key(9.0), key(9.0), key(9.5), key(9.000_000_001)]
        .into_iter()
        .collect::<HashSet<_>>();
    assert_eq!(distinct.len(), 3);
}

#[test]
fn rejects_out_of_range_keys() {
    for hour in [24.0, -0.5, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(ForecastKey::new(hour, 1, true), Err(ForecastError::InvalidKey(_))),
            "hour {hour} accepted"
        );
    }
    assert!(ForecastKey::new(23.99, 6, false).is_ok());
    assert!(ForecastKey::new(0.0, 7, false).is_err());
}

#[test]
fn parses_textual_keys() {
    assert_eq!(ForecastKey::parse(None, None, None).unwrap(), ForecastKey::default());
    assert_eq!(
        ForecastKey::parse(Some("17.25"), Some("4"), Some("false")).unwrap(),
        ForecastKey::new(17.25, 4, false).unwrap()
    );
    assert_eq!(
        ForecastKey::parse(Some("8"), Some("0"), Some("1")).unwrap(),
        ForecastKey::new(8.0, 0, true).unwrap()
    );

    for (hour, day, peak) in [
        (Some("nine"), None, None),
        (None, Some("1.5"), None),
        (None, None, Some("maybe")),
        (Some("nan"), None, None),
        (None, Some("9"), None),
    ] {
        assert!(ForecastKey::parse(hour, day, peak).is_err());
    }
}

#[test]
fn feature_rows_use_capacity_lags() {
    let graph = line_graph();
    let rows = FeatureBuilder::default().rows(&graph, &ForecastKey::new(13.5, 3, false).unwrap());

    assert_eq!(rows.len(), graph.edge_count());
    for row in rows {
        assert_eq!(row.hour, 13.5);
        assert_eq!(row.day_of_week, 3);
        assert_eq!(row.is_peak, 0);
        assert_eq!(row.capacity, 400.0);
        assert_eq!(row.length_m, 100.0);
        assert_relative_eq!(row.flow_lag1, 40.0);
        assert_relative_eq!(row.flow_lag2, 40.0);
    }
}

#[test]
fn table_covers_every_edge() {
    let graph = Graph::from_csv(
        fixture_path(CAMPUS, "nodes.csv"),
        fixture_path(CAMPUS, "edges.csv"),
    )
    .unwrap();
    let cache = ForecastCache::new();

    let table = cache
        .get_or_build(&graph, key(9.0), &FeatureBuilder::default(), &BaselinePredictor, false)
        .unwrap();

    assert_eq!(table.len(), graph.edge_count());
    for (_, _, _, edge) in graph.edges() {
        let entry = table.get(&edge.id).expect("entry for every edge");
        assert!(entry.predicted_flow >= 0.0);
        assert_eq!(entry.capacity, edge.capacity);
    }
}

#[test]
fn clamps_negative_predictions() {
    let graph = line_graph();
    let table = ForecastTable::from_predictions(&graph, key(9.0), vec![-12.0, 30.0]).unwrap();

    assert_eq!(table.get("ab").unwrap().predicted_flow, 0.0);
    assert_eq!(table.get("bc").unwrap().predicted_flow, 30.0);
}

#[test]
fn refuses_partial_or_invalid_predictions() {
    let graph = line_graph();

    assert!(matches!(
        ForecastTable::from_predictions(&graph, key(9.0), vec![1.0]),
        Err(PredictorError::LengthMismatch {
            expected: 2,
            got: 1
        })
    ));
    assert!(matches!(
        ForecastTable::from_predictions(&graph, key(9.0), vec![1.0, f64::NAN]),
        Err(PredictorError::NonFinite { edge, .. }) if edge == "bc"
    ));
}

#[test_log::test]
fn cache_hit_skips_the_predictor() {
    let graph = line_graph();
    let cache = ForecastCache::new();
    let predictor = ConstantPredictor::new(100.0);
    let features = FeatureBuilder::default();

    let first = cache
        .get_or_build(&graph, key(9.0), &features, &predictor, false)
        .unwrap();
    let second = cache
        .get_or_build(&graph, key(9.0), &features, &predictor, false)
        .unwrap();

    assert_eq!(predictor.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.version(), 1);
}

#[test]
fn force_refresh_rebuilds() {
    let graph = line_graph();
    let cache = ForecastCache::new();
    let predictor = ConstantPredictor::new(100.0);
    let features = FeatureBuilder::default();

    let first = cache
        .get_or_build(&graph, key(9.0), &features, &predictor, false)
        .unwrap();
    let refreshed = cache
        .get_or_build(&graph, key(9.0), &features, &predictor, true)
        .unwrap();

    assert_eq!(predictor.calls(), 2);
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(refreshed.version(), 2);
    assert_eq!(cache.len(), 1);
    assert!(Arc::ptr_eq(&cache.get(&key(9.0)).unwrap(), &refreshed));
}

#[test]
fn hit_still_moves_the_active_forecast() {
    let graph = line_graph();
    let cache = ForecastCache::new();
    let predictor = ConstantPredictor::new(100.0);
    let features = FeatureBuilder::default();

    assert!(cache.active().is_none());

    let morning = cache
        .get_or_build(&graph, key(9.0), &features, &predictor, false)
        .unwrap();
    cache
        .get_or_build(&graph, key(17.0), &features, &predictor, false)
        .unwrap();
    assert_eq!(cache.active().unwrap().key(), key(17.0));

    cache
        .get_or_build(&graph, key(9.0), &features, &predictor, false)
        .unwrap();
    assert!(Arc::ptr_eq(&cache.active().unwrap(), &morning));
    assert_eq!(predictor.calls(), 2);
}

#[test]
fn failed_build_keeps_previous_state() {
    let graph = line_graph();
    let cache = ForecastCache::new();
    let features = FeatureBuilder::default();

    let good = cache
        .get_or_build(&graph, key(9.0), &features, &ConstantPredictor::new(10.0), false)
        .unwrap();

    let failed = cache.get_or_build(&graph, key(10.0), &features, &FailingPredictor, false);
    assert!(matches!(failed, Err(PredictorError::Model(_))));

    let short = cache.get_or_build(&graph, key(11.0), &features, &ScriptedPredictor(vec![1.0]), false);
    assert!(matches!(short, Err(PredictorError::LengthMismatch { .. })));

    assert_eq!(cache.len(), 1);
    assert!(Arc::ptr_eq(&cache.active().unwrap(), &good));
}

#[test]
fn clear_forgets_everything() {
    let graph = line_graph();
    let cache = ForecastCache::new();
    cache
        .get_or_build(&graph, key(9.0), &FeatureBuilder::default(), &BaselinePredictor, false)
        .unwrap();

    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.active().is_none());
}

#[test]
fn concurrent_builds_settle_on_one_active_table() {
    let graph = Arc::new(line_graph());
    let cache = Arc::new(ForecastCache::new());

    let handles = (0..8)
        .map(|hour| {
            let graph = Arc::clone(&graph);
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                cache
                    .get_or_build(
                        &graph,
                        key(hour as f64),
                        &FeatureBuilder::default(),
                        &BaselinePredictor,
                        false,
                    )
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();

    let tables = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();

    assert_eq!(cache.len(), 8);

    let versions = tables.iter().map(|t| t.version()).collect::<HashSet<_>>();
    assert_eq!(versions.len(), 8);

    // Last writer wins: the active table is the highest version stored.
    let active = cache.active().unwrap();
    assert_eq!(active.version(), *versions.iter().max().unwrap());
}

#[test]
fn baseline_follows_the_demand_curve() {
    let graph = line_graph();
    let features = FeatureBuilder::default();

    let peak = BaselinePredictor
        .predict(&features.rows(&graph, &ForecastKey::new(0.0, 1, true).unwrap()))
        .unwrap();
    let off_peak = BaselinePredictor
        .predict(&features.rows(&graph, &ForecastKey::new(12.0, 1, false).unwrap()))
        .unwrap();

    // 0.25 * 400 + 0.4 * 400
    assert_relative_eq!(peak[0], 260.0);
    // 0.25 * 400 + 0.1 * 400 + 0.05 * 400 * 0.5
    assert_relative_eq!(off_peak[0], 150.0);
}

#[test]
fn linear_model_from_json() {
    let model = LinearPredictor::from_json(
        r#"{ "intercept": 10.0, "coefficients": { "capacity": 0.5, "is_peak": 100.0 } }"#,
    )
    .unwrap();

    let graph = line_graph();
    let rows = FeatureBuilder::default().rows(&graph, &key(9.0));
    let predictions = model.predict(&rows).unwrap();

    assert_eq!(predictions.len(), 2);
    assert_relative_eq!(predictions[0], 10.0 + 0.5 * 400.0 + 100.0);

    assert!(matches!(
        LinearPredictor::from_json(r#"{ "intercept": 0.0, "coefficients": { "wind": 1.0 } }"#),
        Err(PredictorError::Model(_))
    ));
    assert!(matches!(
        LinearPredictor::from_json("not json"),
        Err(PredictorError::Json(_))
    ));
}
