use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use tracing::trace;
use super::*;
use super::dens::{self, dgamma, dnorm_std};
use crate::batch::{broadcast_len, broadcast_row, select_row};
use crate::error::*;
use crate::stats::NormalStats;

/// Normal-Inverse-Gamma, the conjugate prior for the (unknown) mean and variance of
/// independent gaussian features. For each dimension, the precision lambda ~ Gamma(a, b)
/// (a the shape, b the rate) and the mean mu | lambda ~ Normal(m, 1 / (l lambda)), where m
/// locates the mean and l is its pseudo-count. Fields carry one row per batch entry and one
/// column per dimension. See Murphy (2007) Conjugate Bayesian analysis of the Gaussian distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalInverseGamma {

    m : DMatrix<f64>,

    l : DMatrix<f64>,

    a : DMatrix<f64>,

    b : DMatrix<f64>

}

// Deserialization goes through the validating constructor.
impl<'de> Deserialize<'de> for NormalInverseGamma {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            m : DMatrix<f64>,
            l : DMatrix<f64>,
            a : DMatrix<f64>,
            b : DMatrix<f64>
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.m, f.l, f.a, f.b).map_err(de::Error::custom)
    }

}

impl NormalInverseGamma {

    pub fn new(
        m : DMatrix<f64>,
        l : DMatrix<f64>,
        a : DMatrix<f64>,
        b : DMatrix<f64>
    ) -> Result<Self, ConjugateError> {
        for p in [&l, &a, &b].iter() {
            check_shape("normal-inverse-gamma rows", m.nrows(), p.nrows())?;
            check_shape("normal-inverse-gamma columns", m.ncols(), p.ncols())?;
        }
        check_positive("l", l.iter())?;
        check_positive("a", a.iter())?;
        check_positive("b", b.iter())?;
        Ok(Self { m, l, a, b })
    }

    /// Single-entry batch from per-dimension hyperparameters.
    pub fn from_slices(m : &[f64], l : &[f64], a : &[f64], b : &[f64]) -> Result<Self, ConjugateError> {
        let row = |v : &[f64]| DMatrix::from_row_slice(1, v.len(), v);
        Self::new(row(m), row(l), row(a), row(b))
    }

    /// Single-entry batch with the same hyperparameters at all n_dim dimensions.
    pub fn isotropic(n_dim : usize, m : f64, l : f64, a : f64, b : f64) -> Result<Self, ConjugateError> {
        let el = |v : f64| DMatrix::from_element(1, n_dim, v);
        Self::new(el(m), el(l), el(a), el(b))
    }

    pub fn m(&self) -> &DMatrix<f64> {
        &self.m
    }

    pub fn l(&self) -> &DMatrix<f64> {
        &self.l
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    pub fn n_dim(&self) -> usize {
        self.m.ncols()
    }

    pub fn batch_size(&self) -> usize {
        self.m.nrows()
    }

    /// Returns a single-entry batch with the hyperparameters at entry k.
    pub fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        Ok(Self {
            m : select_row(&self.m, k)?,
            l : select_row(&self.l, k)?,
            a : select_row(&self.a, k)?,
            b : select_row(&self.b, k)?
        })
    }

}

impl Conjugate for NormalInverseGamma {

    type Likelihood = Normal;

    type Stat = NormalStats;

    type Observations = DMatrix<f64>;

    fn stat(&self, y : &DMatrix<f64>) -> Result<NormalStats, ConjugateError> {
        check_shape("continuous dimensions", self.n_dim(), y.ncols())?;
        Ok(NormalStats::from_sample(y))
    }

    fn grouped_stat(
        &self,
        y : &DMatrix<f64>,
        c : &[usize],
        max_clusters : Option<usize>
    ) -> Result<NormalStats, ConjugateError> {
        check_shape("continuous dimensions", self.n_dim(), y.ncols())?;
        NormalStats::grouped(y, c, max_clusters)
    }

    /// l' = l + n; m' = (l m + sum x) / l'; a' = a + n / 2; b' = b + (sum x^2 + l m^2 - l' m'^2) / 2,
    /// applied to every cluster of the statistic (a single-entry prior is shared by all clusters).
    fn update(&self, t : &NormalStats) -> Result<Self, ConjugateError> {
        check_shape("continuous dimensions", self.n_dim(), t.n_dim())?;
        let nrows = broadcast_len("posterior clusters", t.n_clusters(), self.batch_size())?;
        let d = self.n_dim();
        let mut post = Self {
            m : DMatrix::zeros(nrows, d),
            l : DMatrix::zeros(nrows, d),
            a : DMatrix::zeros(nrows, d),
            b : DMatrix::zeros(nrows, d)
        };
        for k in 0..nrows {
            let pk = broadcast_row(self.batch_size(), k);
            let tk = broadcast_row(t.n_clusters(), k);
            let n = t.counts()[tk] as f64;
            for j in 0..d {
                let (m0, l0, a0, b0) = (self.m[(pk, j)], self.l[(pk, j)], self.a[(pk, j)], self.b[(pk, j)]);
                let l1 = l0 + n;
                let m1 = (l0 * m0 + t.sum_x()[(tk, j)]) / l1;
                post.l[(k, j)] = l1;
                post.m[(k, j)] = m1;
                post.a[(k, j)] = a0 + n / 2.0;
                post.b[(k, j)] = b0 + 0.5 * (t.sum_x_sq()[(tk, j)] + l0 * m0.powi(2) - l1 * m1.powi(2));
            }
        }
        trace!(n_clusters = nrows, n_dim = d, "normal-inverse-gamma update");
        Ok(post)
    }

    /// Draws the precision in log-space (ln lambda = ln Gamma(a, 1) - ln b), from which
    /// the data scale is 1 / sqrt(lambda) and the mean scale is 1 / sqrt(l lambda).
    fn sample(&self, key : Key) -> Normal {
        let (gamma_key, normal_key) = key.split();
        let mut gamma_rng = gamma_key.rng();
        let mut normal_rng = normal_key.rng();
        let (nrows, d) = self.m.shape();
        let mut mu = DMatrix::zeros(nrows, d);
        let mut std = DMatrix::zeros(nrows, d);
        for k in 0..nrows {
            for j in 0..d {
                let log_lambda = dens::log_gamma_draw(&mut gamma_rng, self.a[(k, j)]) - self.b[(k, j)].ln();
                let log_sigma = -self.l[(k, j)].ln() - log_lambda;
                let z = dens::std_normal(&mut normal_rng);
                mu[(k, j)] = self.m[(k, j)] + z * (log_sigma / 2.0).exp();
                std[(k, j)] = (-log_lambda / 2.0).exp();
            }
        }
        Normal::from_parts(mu, std)
    }

    /// Gamma log-density of the precision std^-2 plus the normal log-density of the mean
    /// with scale std / sqrt(l).
    fn log_prob(&self, theta : &Normal) -> Result<f64, ConjugateError> {
        check_shape("continuous dimensions", self.n_dim(), theta.n_dim())?;
        let nrows = broadcast_len("normal batch", theta.batch_size(), self.batch_size())?;
        let mut lp = 0.0;
        for k in 0..nrows {
            let pk = broadcast_row(self.batch_size(), k);
            let tk = broadcast_row(theta.batch_size(), k);
            for j in 0..self.n_dim() {
                let ln_std = theta.std()[(tk, j)].ln();
                let precision = (-2.0 * ln_std).exp();
                let ln_mu_scale = ln_std - 0.5 * self.l[(pk, j)].ln();
                let z = (theta.mu()[(tk, j)] - self.m[(pk, j)]) / ln_mu_scale.exp();
                lp += dgamma(precision, self.a[(pk, j)], self.b[(pk, j)]) + dnorm_std(z, ln_mu_scale);
            }
        }
        Ok(lp)
    }

}
