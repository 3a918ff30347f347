use minicart::prelude::*;

fn categorical_tree(policy: UnseenPolicy) -> (Sample, Tree) {
    let codes = vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0];
    let target = vec![0.0, 0.0, 10.0, 10.0, 0.0, 0.0];
    let sample = Sample::from_raw(
        vec![Feature::with_values("league", codes)],
        target,
    ).unwrap()
        .set_categorical(&["league"])
        .unwrap();

    let tree = TreeBuilder::new()
        .min_samples_leaf(1)
        .unseen_policy(policy)
        .fit(&sample)
        .unwrap();

    (sample, tree)
}

fn probe(code: f64) -> Sample {
    Sample::from_raw(
        vec![Feature::with_values("league", vec![code])],
        vec![0.0],
    ).unwrap()
}

#[test]
fn unseen_code_errors_by_default() {
    let (_, tree) = categorical_tree(UnseenPolicy::Error);

    let res = tree.predict(&probe(9.0), 0);
    assert_eq!(
        res,
        Err(TreeError::UnseenCategory {
            feature: "league".to_string(),
            code: 9.0,
        }),
    );
}

#[test]
fn unseen_code_can_be_routed() {
    let (_, tree) = categorical_tree(UnseenPolicy::Left);
    assert_eq!(tree.predict(&probe(9.0), 0).unwrap(), 10.0);

    let (_, tree) = categorical_tree(UnseenPolicy::Right);
    assert_eq!(tree.predict(&probe(9.0), 0).unwrap(), 0.0);
}

#[test]
fn missing_value_at_prediction_is_reported() {
    let sample = Sample::from_raw(
        vec![Feature::with_values("x", vec![1.0, 2.0, 3.0, 4.0])],
        vec![0.0, 0.0, 10.0, 10.0],
    ).unwrap();
    let tree = TreeBuilder::new()
        .min_samples_leaf(1)
        .fit(&sample)
        .unwrap();

    let res = tree.predict(&probe_nan(), 0);
    assert_eq!(
        res,
        Err(TreeError::MissingFeature {
            feature: "x".to_string(),
            row: 0,
        }),
    );
}

fn probe_nan() -> Sample {
    Sample::from_raw(
        vec![Feature::with_values("x", vec![f64::NAN])],
        vec![0.0],
    ).unwrap()
}

#[test]
fn single_leaf_tree_predicts_everywhere() {
    let sample = Sample::from_raw(
        vec![Feature::with_values("x", vec![1.0, 2.0, 3.0, 4.0])],
        vec![1.0, 2.0, 3.0, 4.0],
    ).unwrap();
    let tree = TreeBuilder::new()
        .min_samples_leaf(1)
        .max_depth(0)
        .fit(&sample)
        .unwrap();

    // No rule is evaluated, so even a NaN probe gets the mean.
    assert_eq!(tree.predict(&probe_nan(), 0).unwrap(), 2.5);
}

#[test]
fn predict_proba_sums_to_one() {
    let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let target = vec![-1.0, -1.0, 1.0, -1.0, 1.0, 1.0];
    let sample = Sample::from_raw(
        vec![Feature::with_values("x", values)],
        target,
    ).unwrap();

    let tree = TreeBuilder::new()
        .criterion(Criterion::Gini)
        .min_samples_leaf(3)
        .fit(&sample)
        .unwrap();

    for row in 0..6 {
        let proba = tree.predict_proba(&sample, row).unwrap();
        let total = proba.iter().map(|&(_, p)| p).sum::<f64>();
        assert!((total - 1.0).abs() < 1e-9);

        // Proportions come sorted by label.
        for pair in proba.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }
}
