//! BprModel integration tests.

use pairank::data::{Interactions, ItemId, UserId};
use pairank::model::{BprConfig, BprModel};
use pairank::training::{LossKind, Penalty, TrainError, Verbosity};
use rstest::rstest;

/// Two users with disjoint tastes.
fn two_clusters() -> Interactions {
    Interactions::from_pairs(2, 4, [(0, 0), (0, 1), (1, 2), (1, 3)]).unwrap()
}

fn ranks_rated_first(model: &BprModel, data: &Interactions, user: UserId) -> bool {
    let rated = data.user_items(user).unwrap_or(&[]);
    let score = |item: ItemId| model.predict(user, item).unwrap_or(f32::NAN);
    let worst_rated = rated.iter().map(|&i| score(i)).fold(f32::INFINITY, f32::min);
    let best_unrated = (0..data.n_items() as ItemId)
        .filter(|i| !rated.contains(i))
        .map(score)
        .fold(f32::NEG_INFINITY, f32::max);
    worst_rated > best_unrated
}

#[rstest]
#[case::logistic_adagrad(LossKind::Logistic, true)]
#[case::logistic_sgd(LossKind::Logistic, false)]
#[case::hinge(LossKind::Hinge, true)]
#[case::squared(LossKind::Squared, true)]
fn separates_disjoint_users(#[case] loss: LossKind, #[case] use_adagrad: bool) {
    let data = two_clusters();
    let config = BprConfig::builder()
        .loss(loss)
        .use_adagrad(use_adagrad)
        .n_factors(4)
        .n_epochs(150)
        .build()
        .unwrap();

    let model = BprModel::train(&data, config).unwrap();

    for user in 0..2 {
        assert!(
            ranks_rated_first(&model, &data, user),
            "user {user} not separated with {loss:?}"
        );
    }
}

#[test]
fn mean_loss_decreases_over_training() {
    let data = two_clusters();
    let config = BprConfig::builder().n_epochs(1).build().unwrap();
    let mut model = BprModel::train(&data, config).unwrap();

    let history = model.train_epochs(&data, 60).unwrap();
    let first = history[0].mean_loss();
    let last = history[history.len() - 1].mean_loss();
    assert!(last < first, "mean loss {first} -> {last}");
}

#[test]
fn training_is_reproducible() {
    let data = two_clusters();
    let config = BprConfig::builder().n_epochs(5).seed(11).build().unwrap();

    let a = BprModel::train(&data, config.clone()).unwrap();
    let b = BprModel::train(&data, config).unwrap();
    assert_eq!(a.factors(), b.factors());

    let other = BprConfig::builder().n_epochs(5).seed(12).build().unwrap();
    let c = BprModel::train(&data, other).unwrap();
    assert_ne!(a.factors(), c.factors());
}

#[test]
fn bias_and_adagrad_flags_shape_the_store() {
    let data = two_clusters();
    let config = BprConfig::builder()
        .use_bias(false)
        .use_adagrad(false)
        .n_epochs(1)
        .build()
        .unwrap();
    let model = BprModel::train(&data, config).unwrap();

    assert!(!model.factors().has_bias());
    assert!(model.factors().item_biases().is_none());
    assert!(model.factors().adagrad().is_none());
}

#[test]
fn keyed_interactions_train_end_to_end() {
    let keyed = Interactions::from_keyed([
        ("ana", "tea"),
        ("ana", "scones"),
        ("bo", "coffee"),
        ("bo", "bagel"),
        ("ana", "tea"),
    ])
    .unwrap();
    assert_eq!(keyed.interactions.n_interactions(), 4);

    let config = BprConfig::builder().n_factors(4).n_epochs(150).build().unwrap();
    let model = BprModel::train(&keyed.interactions, config).unwrap();

    let ana = keyed.users.get(&"ana").unwrap();
    let tea = keyed.items.get(&"tea").unwrap();
    let coffee = keyed.items.get(&"coffee").unwrap();
    assert!(model.predict(ana, tea).unwrap() > model.predict(ana, coffee).unwrap());
}

#[test]
fn missing_user_row_fails_training() {
    let data = Interactions::from_pairs(3, 4, [(0, 0), (2, 1)]).unwrap();
    let err = BprModel::train(&data, BprConfig::default()).unwrap_err();
    assert_eq!(err, TrainError::MissingInteractions { user: 1 });
}

#[test]
fn config_json_round_trip() {
    let config = BprConfig::builder()
        .loss(LossKind::Squared)
        .penalty(Penalty::L1)
        .learning_rate(0.05)
        .n_factors(16)
        .verbosity(Verbosity::Warning)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""loss":"squared""#));
    assert!(json.contains(r#""penalty":"l1""#));

    let back: BprConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
