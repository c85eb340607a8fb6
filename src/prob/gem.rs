use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use rand_distr::Distribution;
use tracing::warn;
use super::dens::dbeta;
use crate::error::*;
use crate::key::Key;

/// Stick-breaking (Pitman-Yor) prior over mixture weights, with concentration alpha and
/// discount d. The ith break is distributed as Beta(1 - d, alpha + (i + 1) d); d = 0 recovers
/// the stick-breaking construction of the Dirichlet process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GEM {

    alpha : f64,

    d : f64

}

impl<'de> Deserialize<'de> for GEM {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            alpha : f64,
            d : f64
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.alpha, f.d).map_err(de::Error::custom)
    }

}

impl GEM {

    /// Requires 0 <= d < 1 and alpha > -d.
    pub fn new(alpha : f64, d : f64) -> Result<Self, ConjugateError> {
        if !(d >= 0.0 && d < 1.0) {
            return Err(ConjugateError::param("d", d));
        }
        if !(alpha > -d) {
            return Err(ConjugateError::param("alpha", alpha));
        }
        Ok(Self { alpha, d })
    }

    pub fn dirichlet_process(alpha : f64) -> Result<Self, ConjugateError> {
        Self::new(alpha, 0.0)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    fn break_params(&self, i : usize) -> (f64, f64) {
        (1.0 - self.d, self.alpha + (i + 1) as f64 * self.d)
    }

    /// Log-density of the first k sticks recovered from the weight sequence pi. The first break
    /// is pi[0] itself; later breaks are taken as 1 - pi[i] / pi[i-1].
    pub fn log_prob(&self, pi : &DVector<f64>, k : usize) -> Result<f64, ConjugateError> {
        if k > pi.nrows() {
            return Err(ConjugateError::shape("stick-breaking weights", k, pi.nrows()));
        }
        let mut lp = 0.0;
        for i in 0..k {
            let beta = if i == 0 {
                pi[0]
            } else {
                1.0 - pi[i] / pi[i-1]
            };
            let (a, b) = self.break_params(i);
            lp += dbeta(beta, a, b);
        }
        if !lp.is_finite() {
            warn!(k, log_prob = lp, "stick-breaking log-density is not finite");
        }
        Ok(lp)
    }

    /// Draws the first k weights of the stick-breaking process. The weights sum to less
    /// than one; the remaining mass belongs to the (implicit) tail of the sequence.
    pub fn sample_weights(&self, key : Key, k : usize) -> Result<DVector<f64>, ConjugateError> {
        let mut rng = key.rng();
        let mut remaining = 1.0;
        let mut pi = DVector::zeros(k);
        for i in 0..k {
            let (a, b) = self.break_params(i);
            let beta = rand_distr::Beta::new(a, b)
                .map_err(|_| ConjugateError::param("stick-breaking beta", b) )?;
            let w = beta.sample(&mut rng) * remaining;
            pi[i] = w;
            remaining -= w;
        }
        Ok(pi)
    }

}
