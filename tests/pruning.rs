use minicart::prelude::*;

fn career_sample() -> Sample {
    let years = (1..=12).map(|v| v as f64).collect::<Vec<_>>();
    let salary = vec![
        0.0, 0.0, 0.0, 0.0,
        10.0, 10.0, 10.0, 10.0,
        12.0, 12.0, 12.0, 12.0,
    ];
    Sample::from_raw(
        vec![Feature::with_values("years", years)],
        salary,
    ).unwrap()
}

fn career_tree() -> Tree {
    TreeBuilder::new()
        .criterion(Criterion::Sse)
        .min_samples_leaf(3)
        .fit(&career_sample())
        .unwrap()
}

#[test]
fn sequence_shrinks_to_a_single_leaf() {
    let tree = career_tree();
    let seq = tree.prune_sequence();

    let sizes = seq.iter().map(|s| s.n_leaves).collect::<Vec<_>>();
    assert_eq!(sizes, vec![3, 2, 1]);
    assert_eq!(seq.first().unwrap().tree, tree);
    assert_eq!(seq.last().unwrap().tree.depth(), 0);

    for pair in seq.windows(2) {
        assert!(pair[0].alpha <= pair[1].alpha);
        assert!(pair[0].train_cost <= pair[1].train_cost);
    }

    // Collapsing the shallow right branch costs 8 units of SSE
    // spread over one removed leaf.
    assert_eq!(seq[1].alpha, 8.0);
    assert_eq!(seq[1].train_cost, 8.0);
}

#[test]
fn sequence_members_are_nested() {
    let tree = career_tree();
    let seq = tree.prune_sequence();
    let sample = career_sample();

    // Wherever a smaller member still has structure,
    // it agrees with every larger member above that structure.
    // Verified here through the leaf regions:
    // the 2-leaf member merges only the two high-salary regions.
    let preds = seq[1].tree.predict_all(&sample).unwrap();
    assert_eq!(&preds[..4], &[0.0, 0.0, 0.0, 0.0]);
    assert_eq!(&preds[4..], &[11.0; 8]);
}

#[test]
fn prune_to_size_rounds_up_between_members() {
    // Grow a tree with two tied weakest links, so the sequence
    // jumps from 4 leaves straight to 2.
    let sample = Sample::from_raw(
        vec![Feature::with_values("x", vec![0.0, 1.0, 2.0, 3.0])],
        vec![0.0, 1.0, 10.0, 11.0],
    ).unwrap();
    let tree = TreeBuilder::new()
        .min_samples_leaf(1)
        .fit(&sample)
        .unwrap();
    assert_eq!(tree.n_leaves(), 4);

    let sizes = tree.prune_sequence()
        .iter()
        .map(|s| s.n_leaves)
        .collect::<Vec<_>>();
    assert_eq!(sizes, vec![4, 2, 1]);

    // No member has 3 leaves; the request resolves upwards.
    assert_eq!(tree.prune_to_size(3).unwrap().n_leaves(), 4);
    assert_eq!(tree.prune_to_size(2).unwrap().n_leaves(), 2);
}

#[test]
fn pruning_the_root_predicts_the_global_mean() {
    let tree = career_tree();
    let sample = career_sample();

    let root = tree.prune_to_size(1).unwrap();
    let pred = root.predict(&sample, 0).unwrap();
    let mean = 88.0 / 12.0;
    assert!((pred - mean).abs() < 1e-9);
}

#[test]
fn invalid_sizes_are_rejected() {
    let tree = career_tree();
    assert!(matches!(
        tree.prune_to_size(0),
        Err(TreeError::InvalidPruneSize { requested: 0, available: 3 }),
    ));
    assert!(matches!(
        tree.prune_to_size(4),
        Err(TreeError::InvalidPruneSize { requested: 4, available: 3 }),
    ));
}

#[test]
fn alpha_selects_along_the_sequence() {
    let tree = career_tree();
    assert_eq!(tree.prune_with_alpha(0.0).n_leaves(), 3);
    assert_eq!(tree.prune_with_alpha(7.9), tree.prune_with_alpha(0.0));
    assert_eq!(tree.prune_with_alpha(8.0).n_leaves(), 2);
    assert_eq!(tree.prune_with_alpha(1e9).n_leaves(), 1);
}

#[test]
fn pruning_a_classification_tree_counts_errors() {
    let values = (1..=8).map(|v| v as f64).collect::<Vec<_>>();
    let target = vec![-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0];
    let sample = Sample::from_raw(
        vec![Feature::with_values("x", values)],
        target,
    ).unwrap();

    let tree = TreeBuilder::new()
        .criterion(Criterion::Gini)
        .min_samples_leaf(1)
        .fit(&sample)
        .unwrap();
    assert_eq!(tree.train_cost(), 0.0);

    let seq = tree.prune_sequence();
    let last = seq.last().unwrap();
    assert_eq!(last.n_leaves, 1);
    // A single leaf misclassifies one of the two classes.
    assert_eq!(last.train_cost, 4.0);
}
