use nalgebra::*;
use serde::{Serialize, Deserialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use anyhow::Context;
use tracing::debug;
use crate::batch::Matrices;
use crate::error::*;
use crate::prob::*;
use super::Prior;

/// Hyperparameter informed either as a scalar (shared by all dimensions)
/// or as one value per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hyperparameter {
    Scalar(f64),
    Vector(Vec<f64>)
}

impl Hyperparameter {

    fn expand(&self, n_dim : usize) -> Result<Vec<f64>, ConjugateError> {
        match self {
            Hyperparameter::Scalar(v) => Ok(vec![*v; n_dim]),
            Hyperparameter::Vector(v) => {
                check_shape("hyperparameter dimensions", n_dim, v.len())?;
                Ok(v.clone())
            }
        }
    }

}

/// Dirichlet concentrations, either shared by all entries or as a full
/// (n_dim x n_categories) table informed row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Concentration {
    Scalar(f64),
    Table(Vec<Vec<f64>>)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NigConfig {
    pub n_dim : usize,
    pub m : Hyperparameter,
    pub l : Hyperparameter,
    pub a : Hyperparameter,
    pub b : Hyperparameter
}

impl NigConfig {

    pub fn build(&self) -> Result<NormalInverseGamma, ConjugateError> {
        let n = self.n_dim;
        NormalInverseGamma::from_slices(
            &self.m.expand(n)?[..],
            &self.l.expand(n)?[..],
            &self.a.expand(n)?[..],
            &self.b.expand(n)?[..]
        )
    }

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirichletConfig {
    pub n_dim : usize,
    pub n_categories : usize,
    pub alpha : Concentration
}

impl DirichletConfig {

    pub fn build(&self) -> Result<Dirichlet, ConjugateError> {
        match &self.alpha {
            Concentration::Scalar(a) => Dirichlet::symmetric(self.n_dim, self.n_categories, *a),
            Concentration::Table(rows) => {
                check_shape("concentration rows", self.n_dim, rows.len())?;
                let mut alpha = DMatrix::zeros(self.n_dim, self.n_categories);
                for (i, row) in rows.iter().enumerate() {
                    check_shape("concentration columns", self.n_categories, row.len())?;
                    for (j, a) in row.iter().enumerate() {
                        alpha[(i, j)] = *a;
                    }
                }
                Dirichlet::new(Matrices::single(alpha))
            }
        }
    }

}

/// Base prior over cluster features, tagged by its family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PriorConfig {
    NormalInverseGamma(NigConfig),
    Dirichlet(DirichletConfig),
    Mixed { nig : NigConfig, dirichlet : DirichletConfig }
}

impl PriorConfig {

    pub fn build(&self) -> Result<Prior, ConjugateError> {
        match self {
            PriorConfig::NormalInverseGamma(c) => Ok(Prior::NormalInverseGamma(c.build()?)),
            PriorConfig::Dirichlet(c) => Ok(Prior::Dirichlet(c.build()?)),
            PriorConfig::Mixed { nig, dirichlet } => {
                Ok(Prior::MixedConjugate(MixedConjugate::new(nig.build()?, dirichlet.build()?)?))
            }
        }
    }

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemConfig {
    pub alpha : f64,
    #[serde(default)]
    pub d : f64
}

/// Model definition read from the outside world (e.g. a JSON file): the stick-breaking
/// hyperparameters, the base prior and the truncation level used when grouping statistics.
///
/// ```json
/// {
///   "gem" : { "alpha" : 1.0, "d" : 0.1 },
///   "max_clusters" : 16,
///   "prior" : {
///     "family" : "mixed",
///     "nig" : { "n_dim" : 2, "m" : 0.0, "l" : 1.0, "a" : [1.0, 2.0], "b" : 1.0 },
///     "dirichlet" : { "n_dim" : 1, "n_categories" : 3, "alpha" : 0.5 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub gem : GemConfig,
    pub prior : PriorConfig,
    pub max_clusters : usize
}

impl ModelConfig {

    pub fn load_from_path<P>(path : P) -> anyhow::Result<Self>
    where
        P : AsRef<Path>
    {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("Could not open model definition {}", path.display()))?;
        Self::load(f)
    }

    pub fn load<R>(mut reader : R) -> anyhow::Result<Self>
    where
        R : Read
    {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let config : ModelConfig = serde_json::from_str(&content[..])
            .context("Invalid model definition")?;
        debug!(max_clusters = config.max_clusters, "loaded model definition");
        Ok(config)
    }

    pub fn save_to_path<P>(&self, path : P) -> anyhow::Result<()>
    where
        P : AsRef<Path>
    {
        let path = path.as_ref();
        let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)
            .with_context(|| format!("Could not write model definition {}", path.display()))?;
        self.save(file)
    }

    pub fn save<W>(&self, mut writer : W) -> anyhow::Result<()>
    where
        W : Write
    {
        let content = serde_json::to_string_pretty(&self)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Validates the definition, returning the weight prior and the base prior.
    pub fn build(&self) -> Result<(GEM, Prior), ConjugateError> {
        if self.max_clusters == 0 {
            return Err(ConjugateError::param("max_clusters", 0.0));
        }
        let gem = GEM::new(self.gem.alpha, self.gem.d)?;
        let prior = self.prior.build()?;
        Ok((gem, prior))
    }

}
