use nalgebra::*;
use approx::*;
use stickmix::prob::*;
use stickmix::prob::dens;
use stickmix::stats::*;
use stickmix::batch::Matrices;
use stickmix::{ConjugateError, Key};

const EPS : f64 = 10E-8;

fn continuous_sample() -> DMatrix<f64> {
    DMatrix::from_row_slice(6, 2, &[
        0.5, -1.0,
        1.5, 2.0,
        -0.3, 0.7,
        2.2, -0.4,
        0.9, 1.1,
        -1.7, 0.2
    ])
}

fn discrete_sample() -> DMatrix<usize> {
    DMatrix::from_row_slice(6, 2, &[
        0, 2,
        1, 2,
        1, 0,
        2, 1,
        0, 0,
        1, 2
    ])
}

const LABELS : [usize; 6] = [0, 2, 0, 2, 2, 0];

fn rows_with_label<T : Scalar>(y : &DMatrix<T>, c : &[usize], k : usize) -> DMatrix<T> {
    let ixs : Vec<usize> = c.iter().enumerate().filter(|(_, l)| **l == k ).map(|(i, _)| i ).collect();
    DMatrix::from_fn(ixs.len(), y.ncols(), |i, j| y[(ixs[i], j)].clone() )
}

#[test]
fn end_to_end_single_cluster() {
    let prior = NormalInverseGamma::isotropic(1, 0.0, 1.0, 1.0, 1.0).unwrap();
    let y = DMatrix::from_row_slice(2, 1, &[1.0, 3.0]);
    let stats = prior.stat(&y).unwrap();
    assert_eq!(stats.counts(), &[2]);
    assert_eq!(stats.sum_x()[(0, 0)], 4.0);
    assert_eq!(stats.sum_x_sq()[(0, 0)], 10.0);
    let post = prior.posterior(&y).unwrap();
    assert!((post.l()[(0, 0)] - 3.0).abs() < EPS);
    assert!((post.m()[(0, 0)] - 4.0 / 3.0).abs() < EPS);
    assert!((post.a()[(0, 0)] - 2.0).abs() < EPS);
    let b = 1.0 + 0.5 * (10.0 + 0.0 - 3.0 * (4.0f64 / 3.0).powi(2));
    assert!((post.b()[(0, 0)] - b).abs() < EPS);
}

#[test]
fn raw_statistics_match_raw_batch() {
    let prior = NormalInverseGamma::from_slices(&[0.5, -1.0], &[2.0, 0.5], &[1.5, 3.0], &[0.7, 2.0]).unwrap();
    let y = continuous_sample();
    let sum_x : Vec<f64> = y.column_iter().map(|c| c.sum() ).collect();
    let sum_x_sq : Vec<f64> = y.column_iter().map(|c| c.map(|v| v*v).sum() ).collect();
    let stats = NormalStats::single(y.nrows(), &sum_x[..], &sum_x_sq[..]).unwrap();
    let from_stats = prior.update(&stats).unwrap();
    let from_batch = prior.posterior(&y).unwrap();
    assert_relative_eq!(from_stats.m(), from_batch.m(), epsilon = EPS);
    assert_relative_eq!(from_stats.l(), from_batch.l(), epsilon = EPS);
    assert_relative_eq!(from_stats.a(), from_batch.a(), epsilon = EPS);
    assert_relative_eq!(from_stats.b(), from_batch.b(), epsilon = EPS);
}

#[test]
fn grouped_statistics_match_per_cluster_loop() {
    let y = continuous_sample();
    let stats = NormalStats::grouped(&y, &LABELS, Some(4)).unwrap();
    assert_eq!(stats.n_clusters(), 4);
    for k in 0..4 {
        let yk = rows_with_label(&y, &LABELS, k);
        let single = NormalStats::from_sample(&yk);
        assert_eq!(stats.counts()[k], single.counts()[0]);
        for j in 0..2 {
            assert!((stats.sum_x()[(k, j)] - single.sum_x()[(0, j)]).abs() < EPS);
            assert!((stats.sum_x_sq()[(k, j)] - single.sum_x_sq()[(0, j)]).abs() < EPS);
        }
    }
    let counts = CategoryCounts::grouped(&discrete_sample(), &LABELS, 3, Some(4)).unwrap();
    assert_eq!(counts.n_clusters(), 4);
    for k in 0..4 {
        let yk = rows_with_label(&discrete_sample(), &LABELS, k);
        let single = CategoryCounts::from_sample(&yk, 3).unwrap();
        assert_eq!(counts.counts().slice(k).clone_owned(), single.counts().slice(0).clone_owned());
    }
}

#[test]
fn grouped_posterior_matches_per_cluster_posterior() {
    let prior = NormalInverseGamma::isotropic(2, 0.0, 1.0, 2.0, 1.0).unwrap();
    let y = continuous_sample();
    let post = prior.posterior_grouped(&y, &LABELS, Some(4)).unwrap();
    assert_eq!(post.batch_size(), 4);
    for k in 0..4 {
        let yk = rows_with_label(&y, &LABELS, k);
        let expected = prior.posterior(&yk).unwrap();
        let found = post.index(k).unwrap();
        assert_relative_eq!(found.m(), expected.m(), epsilon = EPS);
        assert_relative_eq!(found.l(), expected.l(), epsilon = EPS);
        assert_relative_eq!(found.a(), expected.a(), epsilon = EPS);
        assert_relative_eq!(found.b(), expected.b(), epsilon = EPS);
    }

    // Empty clusters keep the prior.
    assert_eq!(post.index(1).unwrap(), prior);
    assert_eq!(post.index(3).unwrap(), prior);
}

#[test]
fn cluster_count_defaults_to_largest_label() {
    let prior = NormalInverseGamma::isotropic(2, 0.0, 1.0, 2.0, 1.0).unwrap();
    let post = prior.posterior_grouped(&continuous_sample(), &LABELS, None).unwrap();
    assert_eq!(post.batch_size(), 3);
}

#[test]
fn sequential_updates_are_additive() {
    let prior = NormalInverseGamma::from_slices(&[1.0, 0.0], &[0.5, 4.0], &[1.0, 1.0], &[1.0, 3.0]).unwrap();
    let y = continuous_sample();
    let first = NormalStats::from_sample(&y.rows(0, 2).clone_owned());
    let second = NormalStats::from_sample(&y.rows(2, 4).clone_owned());
    let twice = prior.update(&first).unwrap().update(&second).unwrap();
    let once = prior.update(&first.merge(&second).unwrap()).unwrap();
    assert_relative_eq!(twice.m(), once.m(), epsilon = EPS);
    assert_relative_eq!(twice.l(), once.l(), epsilon = EPS);
    assert_relative_eq!(twice.a(), once.a(), epsilon = EPS);
    assert_relative_eq!(twice.b(), once.b(), epsilon = EPS);
}

#[test]
fn zero_counts_keep_dirichlet() {
    let alpha = DMatrix::from_row_slice(2, 3, &[0.5, 1.0, 2.0, 3.0, 0.1, 1.0]);
    let prior = Dirichlet::from_matrix(alpha).unwrap();
    let zeros = CategoryCounts::new(Matrices::zeros(2, 3, 1)).unwrap();
    assert_eq!(prior.update(&zeros).unwrap(), prior);
}

#[test]
fn dirichlet_posterior_adds_counts() {
    let prior = Dirichlet::symmetric(2, 3, 1.0).unwrap();
    let post = prior.posterior(&discrete_sample()).unwrap();
    let alpha = post.alpha().slice(0);
    assert_eq!(alpha[(0, 0)], 3.0);
    assert_eq!(alpha[(0, 1)], 4.0);
    assert_eq!(alpha[(0, 2)], 2.0);
    assert_eq!(alpha[(1, 2)], 4.0);
    let grouped = prior.posterior_grouped(&discrete_sample(), &LABELS, Some(3)).unwrap();
    assert_eq!(grouped.batch_size(), 3);
    assert_eq!(grouped.index(1).unwrap(), prior);
    // Cluster 0 holds rows 0, 2 and 5: first dimension has categories 0, 1, 1.
    assert_eq!(grouped.alpha().slice(0)[(0, 1)], 3.0);
}

#[test]
fn out_of_range_categories_are_rejected() {
    let prior = Dirichlet::symmetric(2, 2, 1.0).unwrap();
    match prior.posterior(&discrete_sample()) {
        Err(ConjugateError::CategoryIndexOutOfRange { category, dim, n_categories }) => {
            assert_eq!((category, dim, n_categories), (2, 1, 2));
        },
        other => panic!("Unexpected result {:?}", other)
    }
}

#[test]
fn out_of_range_labels_are_rejected() {
    let prior = NormalInverseGamma::isotropic(2, 0.0, 1.0, 1.0, 1.0).unwrap();
    let res = prior.posterior_grouped(&continuous_sample(), &LABELS, Some(2));
    assert_eq!(res, Err(ConjugateError::InvalidLabel { label : 2, bound : 2 }));
    let res = prior.posterior_grouped(&continuous_sample(), &LABELS[0..3], None);
    assert!(matches!(res, Err(ConjugateError::ShapeMismatch { .. })));
}

#[test]
fn dimension_mismatch_is_rejected() {
    let prior = NormalInverseGamma::isotropic(3, 0.0, 1.0, 1.0, 1.0).unwrap();
    let res = prior.posterior(&continuous_sample());
    assert_eq!(res, Err(ConjugateError::ShapeMismatch { what : "continuous dimensions", expected : 3, found : 2 }));
}

#[test]
fn invalid_hyperparameters_are_rejected() {
    assert!(matches!(
        NormalInverseGamma::isotropic(2, 0.0, 0.0, 1.0, 1.0),
        Err(ConjugateError::InvalidParameter { name : "l", .. })
    ));
    assert!(matches!(
        NormalInverseGamma::isotropic(2, 0.0, 1.0, -1.0, 1.0),
        Err(ConjugateError::InvalidParameter { name : "a", .. })
    ));
    assert!(matches!(
        NormalInverseGamma::isotropic(2, 0.0, 1.0, 1.0, f64::NAN),
        Err(ConjugateError::InvalidParameter { name : "b", .. })
    ));
    assert!(Dirichlet::symmetric(2, 2, 0.0).is_err());
    assert!(Normal::from_slices(&[0.0], &[0.0]).is_err());
    assert!(GEM::new(1.0, 1.0).is_err());
    assert!(GEM::new(1.0, -0.1).is_err());
    assert!(GEM::new(-0.5, 0.5).is_err());
    assert!(GEM::new(-0.4, 0.5).is_ok());
    let unnormalized = DMatrix::from_row_slice(1, 2, &[0.5, 0.6]);
    assert!(Categorical::from_probs(&unnormalized).is_err());
}

#[test]
fn standard_normal_at_mode() {
    let n = Normal::from_slices(&[0.0], &[1.0]).unwrap();
    let lp = n.log_prob(&DVector::from_vec(vec![0.0])).unwrap();
    assert_eq!(lp, -0.5 * (2.0 * std::f64::consts::PI).ln());
}

#[test]
fn normal_sums_over_dimensions() {
    let n = Normal::from_slices(&[0.0, 1.0], &[1.0, 2.0]).unwrap();
    let x = DVector::from_vec(vec![0.5, -1.0]);
    let expected = dens::dnorm(0.5, 0.0, 1.0) + dens::dnorm(-1.0, 1.0, 2.0);
    assert!((n.log_prob(&x).unwrap() - expected).abs() < EPS);
    let wrong = DVector::from_vec(vec![0.5]);
    assert!(n.log_prob(&wrong).is_err());
}

#[test]
fn categorical_indexes_requested_cluster() {
    let first = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.5, 0.5]);
    let second = DMatrix::from_row_slice(2, 2, &[0.2, 0.8, 0.3, 0.7]);
    let logprobs = Matrices::from_slices(&[first.map(|p| p.ln() ), second.map(|p| p.ln() )]).unwrap();
    let cat = Categorical::new(logprobs).unwrap();
    let x = DVector::from_vec(vec![1usize, 0]);
    let lp0 = cat.log_prob_at(&x, 0).unwrap();
    let lp1 = cat.log_prob_at(&x, 1).unwrap();
    assert!((lp0 - (0.1f64.ln() + 0.5f64.ln())).abs() < EPS);
    assert!((lp1 - (0.8f64.ln() + 0.3f64.ln())).abs() < EPS);

    // Batched parameters must be indexed before evaluation.
    assert!(matches!(cat.log_prob(&x), Err(ConjugateError::ShapeMismatch { .. })));
    assert_eq!(cat.index(2), Err(ConjugateError::InvalidLabel { label : 2, bound : 2 }));
    let bad = DVector::from_vec(vec![2usize, 0]);
    assert!(matches!(
        cat.log_prob_at(&bad, 0),
        Err(ConjugateError::CategoryIndexOutOfRange { category : 2, dim : 0, n_categories : 2 })
    ));
}

#[test]
fn padded_categories_are_allowed() {
    let probs = DMatrix::from_row_slice(2, 3, &[0.5, 0.5, 0.0, 0.2, 0.3, 0.5]);
    let cat = Categorical::from_probs(&probs).unwrap();
    let x = DVector::from_vec(vec![2usize, 2]);
    assert_eq!(cat.log_prob(&x).unwrap(), f64::NEG_INFINITY);
}

#[test]
fn mixed_density_is_sum_of_components() {
    let normal = Normal::from_slices(&[0.0, 1.0], &[1.0, 0.5]).unwrap();
    let cat = Categorical::from_probs(&DMatrix::from_row_slice(1, 3, &[0.2, 0.3, 0.5])).unwrap();
    let mixed = Mixed::new(normal.clone(), cat.clone()).unwrap();
    let x = MixedPoint {
        continuous : DVector::from_vec(vec![0.1, 0.9]),
        discrete : DVector::from_vec(vec![2])
    };
    let expected = normal.log_prob(&x.continuous).unwrap() + cat.log_prob(&x.discrete).unwrap();
    assert!((mixed.log_prob(&x).unwrap() - expected).abs() < EPS);
}

#[test]
fn sampling_is_reproducible() {
    let nig = NormalInverseGamma::isotropic(3, 0.0, 1.0, 2.0, 2.0).unwrap();
    let key = Key::new(1234);
    assert_eq!(nig.sample(key), nig.sample(key));
    let (k0, k1) = key.split();
    assert_ne!(nig.sample(k0), nig.sample(k1));
    let dir = Dirichlet::symmetric(2, 4, 0.5).unwrap();
    assert_eq!(dir.sample(key), dir.sample(key));
    let mixed = MixedConjugate::new(nig, dir).unwrap();
    let draw = mixed.sample(key);
    assert_eq!(draw.normal().n_dim(), 3);
    assert_eq!(draw.categorical().n_dim(), 2);
    assert_eq!(draw.categorical().n_categories(), 4);
    assert_eq!(draw, mixed.sample(key));
}

#[test]
fn normal_draws_concentrate_with_strong_prior() {
    // a = b = 1E4 pins the precision near one; l = 1E6 pins the mean near m.
    let nig = NormalInverseGamma::isotropic(4, 3.0, 1E6, 1E4, 1E4).unwrap();
    for seed in 0..5 {
        let draw = nig.sample(Key::new(seed));
        assert!(draw.std().iter().all(|s| (s - 1.0).abs() < 0.05 ));
        assert!(draw.mu().iter().all(|m| (m - 3.0).abs() < 0.05 ));
    }
}

#[test]
fn small_shapes_stay_finite() {
    let nig = NormalInverseGamma::isotropic(8, 0.0, 1.0, 1E-3, 1.0).unwrap();
    let draw = nig.sample(Key::new(9));
    assert!(draw.std().iter().all(|s| !s.is_nan() ));
    assert!(draw.std().iter().all(|s| *s > 0.0 ));
    let dir = Dirichlet::symmetric(3, 5, 1E-3).unwrap();
    let cat = dir.sample(Key::new(9));
    assert!(cat.logprobs().iter().all(|lp| !lp.is_nan() ));
}

#[test]
fn dirichlet_draws_are_normalized() {
    let alpha = DMatrix::from_row_slice(2, 2, &[1000.0, 3000.0, 2.0, 2.0]);
    let dir = Dirichlet::from_matrix(alpha).unwrap();
    let cat = dir.sample(Key::new(77));
    let table = cat.logprobs().slice(0);
    for row in table.row_iter() {
        let row : Vec<f64> = row.iter().cloned().collect();
        assert!(dens::logsumexp(&row[..]).abs() < 1E-10);
    }
    assert!((table[(0, 0)].exp() - 0.25).abs() < 0.05);
    assert!((table[(0, 1)].exp() - 0.75).abs() < 0.05);
}

#[test]
fn batched_prior_samples_every_cluster() {
    let prior = NormalInverseGamma::isotropic(2, 0.0, 1.0, 2.0, 1.0).unwrap();
    let post = prior.posterior_grouped(&continuous_sample(), &LABELS, Some(5)).unwrap();
    let draw = post.sample(Key::new(3));
    assert_eq!(draw.batch_size(), 5);
    assert!(post.log_prob(&draw).unwrap().is_finite());
}

#[test]
fn nig_density_of_normal_draw() {
    let nig = NormalInverseGamma::from_slices(&[0.5], &[2.0], &[3.0], &[1.5]).unwrap();
    let theta = Normal::from_slices(&[0.2], &[0.8]).unwrap();
    let expected = dens::dgamma(0.8f64.powi(-2), 3.0, 1.5) + dens::dnorm(0.2, 0.5, 0.8 / 2.0f64.sqrt());
    assert!((nig.log_prob(&theta).unwrap() - expected).abs() < EPS);
}

#[test]
fn dirichlet_density_of_categorical_draw() {
    let dir = Dirichlet::symmetric(2, 3, 1.0).unwrap();
    let cat = Categorical::from_probs(&DMatrix::from_row_slice(2, 3, &[0.2, 0.3, 0.5, 0.1, 0.1, 0.8])).unwrap();
    // Uniform over the 2-simplex has density 2 at each of the two dimensions.
    assert!((dir.log_prob(&cat).unwrap() - 2.0 * 2.0f64.ln()).abs() < EPS);
}

#[test]
fn mixed_conjugate_is_componentwise() {
    let nig = NormalInverseGamma::isotropic(2, 0.0, 1.0, 1.0, 1.0).unwrap();
    let dir = Dirichlet::symmetric(2, 3, 0.5).unwrap();
    let prior = MixedConjugate::new(nig.clone(), dir.clone()).unwrap();
    let y = MixedObservations::new(continuous_sample(), discrete_sample()).unwrap();
    let post = prior.posterior_grouped(&y, &LABELS, Some(3)).unwrap();
    assert_eq!(post.nig(), &nig.posterior_grouped(&continuous_sample(), &LABELS, Some(3)).unwrap());
    assert_eq!(post.dirichlet(), &dir.posterior_grouped(&discrete_sample(), &LABELS, Some(3)).unwrap());
    let single = prior.posterior(&y).unwrap();
    assert_eq!(single.nig(), &nig.posterior(&continuous_sample()).unwrap());
    assert_eq!(single.dirichlet(), &dir.posterior(&discrete_sample()).unwrap());

    let key = Key::new(5);
    let draw = post.sample(key);
    let expected = post.nig().log_prob(draw.normal()).unwrap() + post.dirichlet().log_prob(draw.categorical()).unwrap();
    assert!((post.log_prob(&draw).unwrap() - expected).abs() < EPS);
}

#[test]
fn mismatched_mixed_batches_are_rejected() {
    let y = MixedObservations::new(continuous_sample(), discrete_sample().rows(0, 3).clone_owned());
    assert!(matches!(y, Err(ConjugateError::ShapeMismatch { .. })));
}

fn batched_nig(k : usize) -> NormalInverseGamma {
    let m = [0.0, 1.0, -2.0];
    let l = [1.0, 0.5, 4.0];
    let a = [1.0, 2.0, 0.5];
    let b = [1.0, 3.0, 0.2];
    NormalInverseGamma::new(
        DMatrix::from_row_slice(k, 1, &m[..k]),
        DMatrix::from_row_slice(k, 1, &l[..k]),
        DMatrix::from_row_slice(k, 1, &a[..k]),
        DMatrix::from_row_slice(k, 1, &b[..k])
    ).unwrap()
}

#[test]
fn batched_nig_shares_single_statistic() {
    let prior = batched_nig(3);
    let stats = NormalStats::single(2, &[4.0], &[10.0]).unwrap();
    let post = prior.update(&stats).unwrap();
    assert_eq!(post.batch_size(), 3);
    for k in 0..3 {
        let expected = prior.index(k).unwrap().update(&stats).unwrap();
        let found = post.index(k).unwrap();
        assert_relative_eq!(found.m(), expected.m(), epsilon = EPS);
        assert_relative_eq!(found.l(), expected.l(), epsilon = EPS);
        assert_relative_eq!(found.a(), expected.a(), epsilon = EPS);
        assert_relative_eq!(found.b(), expected.b(), epsilon = EPS);
    }

    let y = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
    let grouped = NormalStats::grouped(&y, &[0, 1, 2], None).unwrap();
    assert_eq!(prior.update(&grouped).unwrap().batch_size(), 3);
    assert!(matches!(batched_nig(2).update(&grouped), Err(ConjugateError::ShapeMismatch { .. })));
}

#[test]
fn batched_nig_scores_single_feature() {
    let prior = batched_nig(3);
    let theta = Normal::from_slices(&[0.5], &[1.5]).unwrap();
    let lp : f64 = (0..3).map(|k| prior.index(k).unwrap().log_prob(&theta).unwrap() ).sum();
    assert!((prior.log_prob(&theta).unwrap() - lp).abs() < EPS);
    let two = Normal::new(DMatrix::zeros(2, 1), DMatrix::from_element(2, 1, 1.0)).unwrap();
    assert!(matches!(prior.log_prob(&two), Err(ConjugateError::ShapeMismatch { .. })));
}

#[test]
fn batched_dirichlet_shares_single_count_table() {
    let slices = [
        DMatrix::from_row_slice(1, 3, &[0.5, 1.0, 2.0]),
        DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]),
        DMatrix::from_row_slice(1, 3, &[3.0, 0.1, 0.2])
    ];
    let prior = Dirichlet::new(Matrices::from_slices(&slices[..]).unwrap()).unwrap();
    let y = DMatrix::from_row_slice(3, 1, &[0usize, 2, 2]);
    let counts = CategoryCounts::from_sample(&y, 3).unwrap();
    let post = prior.update(&counts).unwrap();
    assert_eq!(post.batch_size(), 3);
    for k in 0..3 {
        let expected = prior.index(k).unwrap().update(&counts).unwrap();
        assert_eq!(post.index(k).unwrap(), expected);
        assert_eq!(post.alpha().slice(k)[(0, 0)], slices[k][(0, 0)] + 1.0);
        assert_eq!(post.alpha().slice(k)[(0, 1)], slices[k][(0, 1)]);
        assert_eq!(post.alpha().slice(k)[(0, 2)], slices[k][(0, 2)] + 2.0);
    }

    let two = Dirichlet::new(Matrices::from_slices(&slices[..2]).unwrap()).unwrap();
    let grouped = CategoryCounts::grouped(&y, &[0, 1, 2], 3, None).unwrap();
    assert!(matches!(two.update(&grouped), Err(ConjugateError::ShapeMismatch { .. })));
}

#[test]
fn gem_single_stick() {
    let gem = GEM::new(1.0, 0.0).unwrap();
    let pi = DVector::from_vec(vec![1.0]);
    let lp = gem.log_prob(&pi, 1).unwrap();
    assert!(lp.is_finite());
    assert!((lp - dens::dbeta(1.0, 1.0, 1.0)).abs() < EPS);
    let half = DVector::from_vec(vec![0.5]);
    assert!(gem.log_prob(&half, 1).unwrap().abs() < EPS);
    assert!(matches!(gem.log_prob(&pi, 2), Err(ConjugateError::ShapeMismatch { .. })));
}

#[test]
fn gem_breaks_follow_pitman_yor() {
    let gem = GEM::new(1.0, 0.5).unwrap();
    let pi = DVector::from_vec(vec![0.5, 0.2, 0.1]);
    let expected = dens::dbeta(0.5, 0.5, 1.5) + dens::dbeta(1.0 - 0.2 / 0.5, 0.5, 2.0);
    assert!((gem.log_prob(&pi, 2).unwrap() - expected).abs() < EPS);
    let all = expected + dens::dbeta(1.0 - 0.1 / 0.2, 0.5, 2.5);
    assert!((gem.log_prob(&pi, 3).unwrap() - all).abs() < EPS);
    assert_eq!(gem.log_prob(&pi, 0).unwrap(), 0.0);
}

#[test]
fn gem_weights_leave_remainder() {
    let gem = GEM::new(2.0, 0.25).unwrap();
    let pi = gem.sample_weights(Key::new(11), 10).unwrap();
    assert_eq!(pi.nrows(), 10);
    assert!(pi.iter().all(|w| *w >= 0.0 ));
    assert!(pi.sum() < 1.0);
    assert_eq!(pi, gem.sample_weights(Key::new(11), 10).unwrap());
}
