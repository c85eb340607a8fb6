use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use tracing::trace;
use crate::error::*;
use crate::key::Key;
use crate::prob::*;

/// JSON model definitions.
pub mod config;

pub use config::*;

/// Enumeration of the conjugate priors a mixture component can carry. This is the dynamic
/// counterpart of the Conjugate trait: sample, posterior and log_prob match the variant and
/// dispatch to the respective implementation, and fail with FamilyMismatch when the data or
/// parameters belong to another family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prior {
    NormalInverseGamma(NormalInverseGamma),
    Dirichlet(Dirichlet),
    MixedConjugate(MixedConjugate)
}

/// Likelihood parameters for a batch of clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    Normal(Normal),
    Categorical(Categorical),
    Mixed(Mixed)
}

/// A single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Datapoint {
    Continuous(DVector<f64>),
    Discrete(DVector<usize>),
    Mixed(MixedPoint)
}

/// A batch of observations, over rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Observations {
    Continuous(DMatrix<f64>),
    Discrete(DMatrix<usize>),
    Mixed(MixedObservations)
}

impl Prior {

    pub fn family(&self) -> &'static str {
        match self {
            Prior::NormalInverseGamma(_) => "normal-inverse-gamma prior",
            Prior::Dirichlet(_) => "dirichlet prior",
            Prior::MixedConjugate(_) => "mixed conjugate prior"
        }
    }

    pub fn batch_size(&self) -> usize {
        match self {
            Prior::NormalInverseGamma(p) => p.batch_size(),
            Prior::Dirichlet(p) => p.batch_size(),
            Prior::MixedConjugate(p) => p.batch_size()
        }
    }

    pub fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        match self {
            Prior::NormalInverseGamma(p) => Ok(Prior::NormalInverseGamma(p.index(k)?)),
            Prior::Dirichlet(p) => Ok(Prior::Dirichlet(p.index(k)?)),
            Prior::MixedConjugate(p) => Ok(Prior::MixedConjugate(p.index(k)?))
        }
    }

    pub fn sample(&self, key : Key) -> Feature {
        match self {
            Prior::NormalInverseGamma(p) => Feature::Normal(p.sample(key)),
            Prior::Dirichlet(p) => Feature::Categorical(p.sample(key)),
            Prior::MixedConjugate(p) => Feature::Mixed(p.sample(key))
        }
    }

    /// Posterior treating the whole batch as a single cluster.
    pub fn posterior(&self, y : &Observations) -> Result<Self, ConjugateError> {
        match (self, y) {
            (Prior::NormalInverseGamma(p), Observations::Continuous(y)) => {
                Ok(Prior::NormalInverseGamma(p.posterior(y)?))
            },
            (Prior::Dirichlet(p), Observations::Discrete(y)) => {
                Ok(Prior::Dirichlet(p.posterior(y)?))
            },
            (Prior::MixedConjugate(p), Observations::Mixed(y)) => {
                Ok(Prior::MixedConjugate(p.posterior(y)?))
            },
            (p, y) => Err(ConjugateError::FamilyMismatch { expected : p.family(), found : y.family() })
        }
    }

    /// Batch of posteriors, one per cluster label up to max_clusters.
    pub fn posterior_grouped(
        &self,
        y : &Observations,
        c : &[usize],
        max_clusters : Option<usize>
    ) -> Result<Self, ConjugateError> {
        match (self, y) {
            (Prior::NormalInverseGamma(p), Observations::Continuous(y)) => {
                Ok(Prior::NormalInverseGamma(p.posterior_grouped(y, c, max_clusters)?))
            },
            (Prior::Dirichlet(p), Observations::Discrete(y)) => {
                Ok(Prior::Dirichlet(p.posterior_grouped(y, c, max_clusters)?))
            },
            (Prior::MixedConjugate(p), Observations::Mixed(y)) => {
                Ok(Prior::MixedConjugate(p.posterior_grouped(y, c, max_clusters)?))
            },
            (p, y) => Err(ConjugateError::FamilyMismatch { expected : p.family(), found : y.family() })
        }
    }

    /// Log-density of likelihood parameters under this prior.
    pub fn log_prob(&self, f : &Feature) -> Result<f64, ConjugateError> {
        match (self, f) {
            (Prior::NormalInverseGamma(p), Feature::Normal(f)) => p.log_prob(f),
            (Prior::Dirichlet(p), Feature::Categorical(f)) => p.log_prob(f),
            (Prior::MixedConjugate(p), Feature::Mixed(f)) => p.log_prob(f),
            (p, f) => Err(ConjugateError::FamilyMismatch { expected : p.family(), found : f.family() })
        }
    }

}

impl Feature {

    pub fn family(&self) -> &'static str {
        match self {
            Feature::Normal(_) => "normal feature",
            Feature::Categorical(_) => "categorical feature",
            Feature::Mixed(_) => "mixed feature"
        }
    }

    pub fn batch_size(&self) -> usize {
        match self {
            Feature::Normal(f) => f.batch_size(),
            Feature::Categorical(f) => f.batch_size(),
            Feature::Mixed(f) => f.batch_size()
        }
    }

    /// Selects the parameters of cluster k.
    pub fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        match self {
            Feature::Normal(f) => Ok(Feature::Normal(f.index(k)?)),
            Feature::Categorical(f) => Ok(Feature::Categorical(f.index(k)?)),
            Feature::Mixed(f) => Ok(Feature::Mixed(f.index(k)?))
        }
    }

    /// Log-probability of a point under single-cluster parameters.
    pub fn log_prob(&self, x : &Datapoint) -> Result<f64, ConjugateError> {
        match (self, x) {
            (Feature::Normal(f), Datapoint::Continuous(x)) => f.log_prob(x),
            (Feature::Categorical(f), Datapoint::Discrete(x)) => f.log_prob(x),
            (Feature::Mixed(f), Datapoint::Mixed(x)) => f.log_prob(x),
            (f, x) => Err(ConjugateError::FamilyMismatch { expected : f.family(), found : x.family() })
        }
    }

    /// Log-probability of a point under the parameters of cluster k.
    pub fn log_prob_at(&self, x : &Datapoint, k : usize) -> Result<f64, ConjugateError> {
        self.index(k)?.log_prob(x)
    }

}

impl Datapoint {

    pub fn family(&self) -> &'static str {
        match self {
            Datapoint::Continuous(_) => "continuous datapoint",
            Datapoint::Discrete(_) => "discrete datapoint",
            Datapoint::Mixed(_) => "mixed datapoint"
        }
    }

}

impl Observations {

    pub fn family(&self) -> &'static str {
        match self {
            Observations::Continuous(_) => "continuous observations",
            Observations::Discrete(_) => "discrete observations",
            Observations::Mixed(_) => "mixed observations"
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Observations::Continuous(y) => y.nrows(),
            Observations::Discrete(y) => y.nrows(),
            Observations::Mixed(y) => y.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the ith observation.
    pub fn point(&self, i : usize) -> Option<Datapoint> {
        if i >= self.len() {
            return None;
        }
        match self {
            Observations::Continuous(y) => Some(Datapoint::Continuous(y.row(i).transpose())),
            Observations::Discrete(y) => Some(Datapoint::Discrete(y.row(i).transpose())),
            Observations::Mixed(y) => y.point(i).map(Datapoint::Mixed)
        }
    }

    pub fn points(&self) -> impl Iterator<Item=Datapoint> + '_ {
        (0..self.len()).filter_map(move |i| self.point(i) )
    }

}

/// Current cluster assignment: a label for each observation, the mixing weights of the
/// first K sticks and the feature parameters of each of the K clusters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {

    c : Vec<usize>,

    pi : DVector<f64>,

    f : Feature

}

impl<'de> Deserialize<'de> for Cluster {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            c : Vec<usize>,
            pi : DVector<f64>,
            f : Feature
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.c, f.pi, f.f).map_err(de::Error::custom)
    }

}

// Tolerance on the total mass of the mixing weights.
const MASS_TOL : f64 = 1E-8;

impl Cluster {

    /// Requires labels in [0, K), one set of feature parameters per weight,
    /// and non-negative weights summing to at most one.
    pub fn new(c : Vec<usize>, pi : DVector<f64>, f : Feature) -> Result<Self, ConjugateError> {
        let k = pi.nrows();
        check_shape("cluster features", k, f.batch_size())?;
        if let Some(label) = c.iter().find(|l| **l >= k ) {
            return Err(ConjugateError::InvalidLabel { label : *label, bound : k });
        }
        if let Some(w) = pi.iter().find(|w| !(**w >= 0.0) ) {
            return Err(ConjugateError::param("pi", *w));
        }
        let mass = pi.sum();
        if mass > 1.0 + MASS_TOL {
            return Err(ConjugateError::param("sum of pi", mass));
        }
        Ok(Self { c, pi, f })
    }

    pub fn labels(&self) -> &[usize] {
        &self.c[..]
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.pi
    }

    pub fn features(&self) -> &Feature {
        &self.f
    }

    /// Maximum number of clusters (length of the weight vector).
    pub fn n_clusters(&self) -> usize {
        self.pi.nrows()
    }

    /// Number of clusters with at least one observation assigned.
    pub fn n_active(&self) -> usize {
        let mut seen = vec![false; self.n_clusters()];
        self.c.iter().for_each(|l| seen[*l] = true );
        seen.iter().filter(|s| **s ).count()
    }

    /// Log-likelihood of each observation under the features of its assigned cluster.
    pub fn log_likelihood(&self, y : &Observations) -> Result<DVector<f64>, ConjugateError> {
        check_shape("cluster labels", self.c.len(), y.len())?;
        let mut lls = DVector::zeros(y.len());
        for (i, (x, label)) in y.points().zip(self.c.iter()).enumerate() {
            lls[i] = self.f.log_prob_at(&x, *label)?;
        }
        Ok(lls)
    }

}

/// Full state of a stick-breaking mixture: hyperparameters of the weights, the base
/// prior (or its posterior) over cluster features, and the current assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub gem : GEM,
    pub g : Prior,
    pub cluster : Cluster
}

impl Trace {

    pub fn new(gem : GEM, g : Prior, cluster : Cluster) -> Self {
        Self { gem, g, cluster }
    }

    /// Per-cluster posterior of the base prior, given the current assignment. The output
    /// holds one entry per weight, including clusters without observations.
    pub fn posterior(&self, y : &Observations) -> Result<Prior, ConjugateError> {
        self.g.posterior_grouped(y, self.cluster.labels(), Some(self.cluster.n_clusters()))
    }

    /// Joint log-density of the state: stick-breaking density of the weights (over all K
    /// sticks), the prior density of the cluster features, and the data log-likelihood.
    pub fn log_joint(&self, y : &Observations) -> Result<f64, ConjugateError> {
        let k = self.cluster.n_clusters();
        let lp_pi = self.gem.log_prob(self.cluster.weights(), k)?;
        let lp_f = self.g.log_prob(self.cluster.features())?;
        let ll = self.cluster.log_likelihood(y)?.sum();
        trace!(lp_pi, lp_f, ll, "trace log-joint");
        Ok(lp_pi + lp_f + ll)
    }

}
