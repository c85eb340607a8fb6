use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use super::*;
use crate::error::*;
use crate::stats::{NormalStats, CategoryCounts};

/// A single observation with continuous and discrete features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedPoint {
    pub continuous : DVector<f64>,
    pub discrete : DVector<usize>
}

/// A batch of observations with continuous and discrete features, over rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixedObservations {

    continuous : DMatrix<f64>,

    discrete : DMatrix<usize>

}

impl<'de> Deserialize<'de> for MixedObservations {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            continuous : DMatrix<f64>,
            discrete : DMatrix<usize>
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.continuous, f.discrete).map_err(de::Error::custom)
    }

}

impl MixedObservations {

    pub fn new(continuous : DMatrix<f64>, discrete : DMatrix<usize>) -> Result<Self, ConjugateError> {
        check_shape("discrete observations", continuous.nrows(), discrete.nrows())?;
        Ok(Self { continuous, discrete })
    }

    pub fn continuous(&self) -> &DMatrix<f64> {
        &self.continuous
    }

    pub fn discrete(&self) -> &DMatrix<usize> {
        &self.discrete
    }

    pub fn len(&self) -> usize {
        self.continuous.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn point(&self, i : usize) -> Option<MixedPoint> {
        if i >= self.len() {
            return None;
        }
        Some(MixedPoint {
            continuous : self.continuous.row(i).transpose(),
            discrete : self.discrete.row(i).transpose()
        })
    }

}

/// Joint sufficient statistic of a mixed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedStats {
    pub normal : NormalStats,
    pub counts : CategoryCounts
}

/// Likelihood parameters of the continuous and discrete features of a batch of clusters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mixed {

    normal : Normal,

    categorical : Categorical

}

impl<'de> Deserialize<'de> for Mixed {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            normal : Normal,
            categorical : Categorical
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.normal, f.categorical).map_err(de::Error::custom)
    }

}

impl Mixed {

    pub fn new(normal : Normal, categorical : Categorical) -> Result<Self, ConjugateError> {
        check_shape("mixed batch", normal.batch_size(), categorical.batch_size())?;
        Ok(Self { normal, categorical })
    }

    pub fn normal(&self) -> &Normal {
        &self.normal
    }

    pub fn categorical(&self) -> &Categorical {
        &self.categorical
    }

}

impl Likelihood for Mixed {

    type Point = MixedPoint;

    fn batch_size(&self) -> usize {
        self.normal.batch_size()
    }

    fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        Ok(Self { normal : self.normal.index(k)?, categorical : self.categorical.index(k)? })
    }

    fn log_prob(&self, x : &MixedPoint) -> Result<f64, ConjugateError> {
        Ok(self.normal.log_prob(&x.continuous)? + self.categorical.log_prob(&x.discrete)?)
    }

}

/// Joint conjugate prior over Mixed parameters: the continuous and discrete sides
/// are a priori independent, so every operation applies componentwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixedConjugate {

    nig : NormalInverseGamma,

    dirichlet : Dirichlet

}

impl<'de> Deserialize<'de> for MixedConjugate {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            nig : NormalInverseGamma,
            dirichlet : Dirichlet
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.nig, f.dirichlet).map_err(de::Error::custom)
    }

}

impl MixedConjugate {

    pub fn new(nig : NormalInverseGamma, dirichlet : Dirichlet) -> Result<Self, ConjugateError> {
        check_shape("mixed conjugate batch", nig.batch_size(), dirichlet.batch_size())?;
        Ok(Self { nig, dirichlet })
    }

    pub fn nig(&self) -> &NormalInverseGamma {
        &self.nig
    }

    pub fn dirichlet(&self) -> &Dirichlet {
        &self.dirichlet
    }

    pub fn batch_size(&self) -> usize {
        self.nig.batch_size()
    }

    pub fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        Ok(Self { nig : self.nig.index(k)?, dirichlet : self.dirichlet.index(k)? })
    }

}

impl Conjugate for MixedConjugate {

    type Likelihood = Mixed;

    type Stat = MixedStats;

    type Observations = MixedObservations;

    fn stat(&self, y : &MixedObservations) -> Result<MixedStats, ConjugateError> {
        Ok(MixedStats { normal : self.nig.stat(&y.continuous)?, counts : self.dirichlet.stat(&y.discrete)? })
    }

    fn grouped_stat(
        &self,
        y : &MixedObservations,
        c : &[usize],
        max_clusters : Option<usize>
    ) -> Result<MixedStats, ConjugateError> {
        Ok(MixedStats {
            normal : self.nig.grouped_stat(&y.continuous, c, max_clusters)?,
            counts : self.dirichlet.grouped_stat(&y.discrete, c, max_clusters)?
        })
    }

    fn update(&self, t : &MixedStats) -> Result<Self, ConjugateError> {
        Self::new(self.nig.update(&t.normal)?, self.dirichlet.update(&t.counts)?)
    }

    fn sample(&self, key : Key) -> Mixed {
        let (normal_key, cat_key) = key.split();
        Mixed { normal : self.nig.sample(normal_key), categorical : self.dirichlet.sample(cat_key) }
    }

    fn log_prob(&self, theta : &Mixed) -> Result<f64, ConjugateError> {
        Ok(self.nig.log_prob(&theta.normal)? + self.dirichlet.log_prob(&theta.categorical)?)
    }

}
