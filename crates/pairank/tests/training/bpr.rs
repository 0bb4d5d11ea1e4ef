//! BPR trainer integration tests.
//!
//! Focused on the epoch sequence and update behavior rather than shapes.

use approx::assert_abs_diff_eq;
use ndarray::arr1;
use pairank::data::Interactions;
use pairank::repr::{FactorInit, FactorModel};
use pairank::training::{
    for_each_training_triple, BprParams, BprTrainer, Loss, LogisticLoss, NegativeSampler,
    PairwiseLoss, SamplingError, TrainError, POSITIVE_PREFERENCE,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rstest::rstest;

fn toy() -> Interactions {
    Interactions::from_pairs(
        3,
        6,
        [(0, 0), (0, 1), (0, 4), (1, 2), (1, 3), (2, 5), (2, 0)],
    )
    .unwrap()
}

#[test]
fn single_user_epoch_draws_only_unrated_negatives() {
    let data = Interactions::from_pairs(1, 3, [(0, 0)]).unwrap();
    let mut model = FactorModel::new(&data, &FactorInit::default());
    let mut trainer = BprTrainer::new(
        LogisticLoss,
        BprParams {
            n_negatives: 2,
            ..Default::default()
        },
    );
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(17);
    let mut replay_rng = rng.clone();

    let stats = trainer
        .train_one_iteration(&mut model, &data, &mut rng)
        .unwrap();
    assert_eq!(stats.n_pairs, 2);

    let sampler = NegativeSampler::new(3, 1000);
    let mut triples = Vec::new();
    for_each_training_triple(&data, &sampler, 2, &mut replay_rng, |u, i, j| {
        triples.push((u, i, j));
        Ok(())
    })
    .unwrap();

    assert_eq!(triples.len(), 2);
    assert!(triples
        .iter()
        .all(|&(u, i, j)| u == 0 && i == 0 && (j == 1 || j == 2)));
}

#[test]
fn epoch_equals_replayed_pair_updates() {
    let data = toy();
    let params = BprParams::default();
    let init = FactorInit {
        seed: 7,
        ..Default::default()
    };

    let mut model = FactorModel::new(&data, &init);
    let start = model.clone();
    let mut trainer = BprTrainer::new(LogisticLoss, params.clone());
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
    let mut replay_rng = rng.clone();

    let stats = trainer
        .train_one_iteration(&mut model, &data, &mut rng)
        .unwrap();

    let sampler = NegativeSampler::new(data.n_items(), params.max_negative_draws);
    let mut triples = Vec::new();
    for_each_training_triple(&data, &sampler, params.n_negatives, &mut replay_rng, |u, i, j| {
        triples.push((u, i, j));
        Ok(())
    })
    .unwrap();

    // Shape of the sequence: users ascending, K negatives per rated item, never rated.
    assert_eq!(triples.len(), data.n_interactions() * params.n_negatives as usize);
    assert_eq!(stats.n_pairs, triples.len());
    assert!(triples.windows(2).all(|w| w[0].0 <= w[1].0));
    for &(u, i, j) in &triples {
        assert!(data.contains(u, i));
        assert!(!data.contains(u, j));
    }

    let mut replayed = start;
    let mut replay_trainer = BprTrainer::new(LogisticLoss, params);
    let mut loss_sum = 0.0f64;
    for (u, i, j) in triples {
        let loss = replay_trainer
            .train_one_pair(&mut replayed, u, i, j, POSITIVE_PREFERENCE)
            .unwrap();
        loss_sum += f64::from(loss);
    }

    assert_eq!(replayed, model);
    assert_abs_diff_eq!(stats.loss_sum, loss_sum, epsilon = 1e-9);
}

#[test]
fn epoch_touches_every_active_row() {
    let data = toy();
    let mut model = FactorModel::new(&data, &FactorInit::default());
    let start = model.clone();
    let mut trainer = BprTrainer::new(LogisticLoss, BprParams::default());
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

    trainer
        .train_one_iteration(&mut model, &data, &mut rng)
        .unwrap();

    for u in 0..data.n_users() {
        assert_ne!(model.user_row(u), start.user_row(u), "user {u} unchanged");
    }
    // Every item is a positive for some user.
    for i in 0..data.n_items() {
        assert_ne!(model.item_row(i), start.item_row(i), "item {i} unchanged");
    }

    let state = model.adagrad().unwrap();
    assert!(state.user().iter().all(|&a| a > 0.0));
}

#[rstest]
#[case::logistic(Loss::logistic())]
#[case::hinge(Loss::hinge())]
#[case::squared(Loss::squared())]
fn single_update_lowers_pair_loss(#[case] loss: Loss) {
    let mut model = FactorModel::zeros(1, 3, 2, true, false);
    model.user_row_mut(0).assign(&arr1(&[0.3, -0.2]));
    model.item_row_mut(1).assign(&arr1(&[0.1, 0.2]));
    model.item_row_mut(2).assign(&arr1(&[-0.2, 0.1]));

    let before = model.predict(0, 1) - model.predict(0, 2);
    let mut trainer = BprTrainer::new(
        loss.clone(),
        BprParams {
            learning_rate: 0.01,
            lambda: 0.0,
            ..Default::default()
        },
    );

    let reported = trainer
        .train_one_pair(&mut model, 0, 1, 2, POSITIVE_PREFERENCE)
        .unwrap();
    let after = model.predict(0, 1) - model.predict(0, 2);

    assert_abs_diff_eq!(reported, loss.loss(before, 1.0), epsilon = 1e-6);
    assert!(after > before, "{}: margin {before} -> {after}", loss.name());
    assert!(loss.loss(after, 1.0) < loss.loss(before, 1.0));

    let second = trainer
        .train_one_pair(&mut model, 0, 1, 2, POSITIVE_PREFERENCE)
        .unwrap();
    assert!(second < reported);
    // Item 0 was not part of the pair.
    assert_eq!(model.item_row(0), arr1(&[0.0f32, 0.0]));
}

#[test]
fn user_without_interactions_aborts() {
    let data = Interactions::from_pairs(3, 4, [(0, 1), (2, 3)]).unwrap();
    let mut model = FactorModel::new(&data, &FactorInit::default());
    let mut trainer = BprTrainer::new(LogisticLoss, BprParams::default());
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

    let err = trainer
        .train_one_iteration(&mut model, &data, &mut rng)
        .unwrap_err();
    assert_eq!(err, TrainError::MissingInteractions { user: 1 });
    assert_eq!(err.to_string(), "user 1 has no recorded interactions");
}

#[test]
fn user_who_rated_everything_exhausts_sampler() {
    let data = Interactions::from_pairs(2, 3, [(0, 0), (1, 0), (1, 1), (1, 2)]).unwrap();
    let mut model = FactorModel::new(&data, &FactorInit::default());
    let mut trainer = BprTrainer::new(LogisticLoss, BprParams::default());
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

    let err = trainer
        .train_one_iteration(&mut model, &data, &mut rng)
        .unwrap_err();
    assert_eq!(
        err,
        TrainError::Sampling(SamplingError::Exhausted {
            n_rated: 3,
            n_items: 3,
            attempts: 0
        })
    );
}

#[test]
fn callback_error_stops_iteration() {
    let data = toy();
    let sampler = NegativeSampler::new(data.n_items(), 1000);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    let mut seen = 0usize;

    let result = for_each_training_triple(&data, &sampler, 1, &mut rng, |u, _, _| {
        seen += 1;
        if u == 1 {
            Err(TrainError::MissingInteractions { user: u })
        } else {
            Ok(())
        }
    });

    assert!(result.is_err());
    // User 0 has three rated items; the first triple of user 1 fails.
    assert_eq!(seen, 4);
}

#[test]
fn same_seed_same_parameters() {
    let data = toy();
    let run = |seed: u64| {
        let mut model = FactorModel::new(&data, &FactorInit::default());
        let mut trainer = BprTrainer::new(LogisticLoss, BprParams::default());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        for _ in 0..3 {
            trainer
                .train_one_iteration(&mut model, &data, &mut rng)
                .unwrap();
        }
        model
    };

    assert_eq!(run(1), run(1));
    assert_ne!(run(1), run(2));
}
