use std::fmt::Debug;
use crate::error::ConjugateError;
use crate::key::Key;

/// Scalar log-densities and primitive random draws shared by the distributions below.
pub mod dens;

mod normal;

pub use normal::*;

mod categorical;

pub use categorical::*;

mod nig;

pub use nig::*;

mod dirichlet;

pub use dirichlet::*;

mod mixed;

pub use mixed::*;

mod gem;

pub use gem::*;

/// Trait shared by the likelihood-side parameter types (Normal, Categorical and Mixed).
/// Parameters are batched over their leading dimension (usually one entry per cluster);
/// index(.) extracts a single-entry batch, against which a datapoint can be evaluated.
pub trait Likelihood
where
    Self : Debug + Clone + Sized
{

    /// A single observation, with the same dimensionality as the parameter.
    type Point : ?Sized;

    /// Number of entries at the leading (cluster) dimension.
    fn batch_size(&self) -> usize;

    /// Returns a new single-entry batch holding the parameters at entry k.
    fn index(&self, k : usize) -> Result<Self, ConjugateError>;

    /// Log-probability of the informed point, summed over feature dimensions.
    /// Requires a single-entry batch.
    fn log_prob(&self, x : &Self::Point) -> Result<f64, ConjugateError>;

    /// Log-probability of the point under the parameters of entry k.
    fn log_prob_at(&self, x : &Self::Point, k : usize) -> Result<f64, ConjugateError> {
        self.index(k)?.log_prob(x)
    }

}

/// Trait shared by the prior-side parameter types (NormalInverseGamma, Dirichlet and
/// MixedConjugate). A conjugate prior is updated in closed form from a sufficient statistic,
/// and yields a posterior of the same family. Statistics carry a leading cluster dimension,
/// and update(.) is applied to every cluster at once, so a single prior becomes a batch of
/// posteriors (one per cluster, including empty clusters).
pub trait Conjugate
where
    Self : Debug + Clone + Sized
{

    /// Parameter type drawn from this prior.
    type Likelihood : Likelihood;

    /// Sufficient statistic, with one entry per cluster.
    type Stat;

    /// Batch of observations, arranged over rows.
    type Observations : ?Sized;

    /// Collapses the whole batch into the statistic of a single cluster.
    fn stat(&self, y : &Self::Observations) -> Result<Self::Stat, ConjugateError>;

    /// Collapses the batch into per-cluster statistics, grouping observations by their label.
    fn grouped_stat(
        &self,
        y : &Self::Observations,
        c : &[usize],
        max_clusters : Option<usize>
    ) -> Result<Self::Stat, ConjugateError>;

    /// Closed-form conjugate update with respect to the informed statistic.
    fn update(&self, t : &Self::Stat) -> Result<Self, ConjugateError>;

    /// Posterior treating the batch as a single cluster.
    fn posterior(&self, y : &Self::Observations) -> Result<Self, ConjugateError> {
        let t = self.stat(y)?;
        self.update(&t)
    }

    /// Batch of posteriors, one per cluster up to max_clusters.
    fn posterior_grouped(
        &self,
        y : &Self::Observations,
        c : &[usize],
        max_clusters : Option<usize>
    ) -> Result<Self, ConjugateError> {
        let t = self.grouped_stat(y, c, max_clusters)?;
        self.update(&t)
    }

    /// Draws a likelihood parameter (one per batch entry) from this distribution.
    fn sample(&self, key : Key) -> Self::Likelihood;

    /// Log-density of a likelihood parameter under this distribution, summed over batch
    /// entries and dimensions.
    fn log_prob(&self, theta : &Self::Likelihood) -> Result<f64, ConjugateError>;

}

/// Verifies the likelihood parameter is a single-entry batch, as required to evaluate a point.
pub(crate) fn check_single(batch_size : usize) -> Result<(), ConjugateError> {
    crate::error::check_shape("batch size", 1, batch_size)
}
