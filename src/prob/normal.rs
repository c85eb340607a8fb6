use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use super::*;
use super::dens::dnorm_std;
use crate::batch::select_row;
use crate::error::*;

/// Per-dimension (independent) gaussian likelihood parameters. Both fields have one row
/// per batch entry and one column per feature dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normal {

    mu : DMatrix<f64>,

    std : DMatrix<f64>

}

impl<'de> Deserialize<'de> for Normal {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            mu : DMatrix<f64>,
            std : DMatrix<f64>
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.mu, f.std).map_err(de::Error::custom)
    }

}

impl Normal {

    pub fn new(mu : DMatrix<f64>, std : DMatrix<f64>) -> Result<Self, ConjugateError> {
        check_shape("normal std rows", mu.nrows(), std.nrows())?;
        check_shape("normal std columns", mu.ncols(), std.ncols())?;
        check_positive("std", std.iter())?;
        Ok(Self { mu, std })
    }

    /// Single-entry batch from per-dimension means and standard deviations.
    pub fn from_slices(mu : &[f64], std : &[f64]) -> Result<Self, ConjugateError> {
        Self::new(DMatrix::from_row_slice(1, mu.len(), mu), DMatrix::from_row_slice(1, std.len(), std))
    }

    pub fn mu(&self) -> &DMatrix<f64> {
        &self.mu
    }

    pub fn std(&self) -> &DMatrix<f64> {
        &self.std
    }

    pub fn n_dim(&self) -> usize {
        self.mu.ncols()
    }

    // Draws from a normal-inverse-gamma are positive by construction.
    pub(crate) fn from_parts(mu : DMatrix<f64>, std : DMatrix<f64>) -> Self {
        Self { mu, std }
    }

}

impl Likelihood for Normal {

    type Point = DVector<f64>;

    fn batch_size(&self) -> usize {
        self.mu.nrows()
    }

    fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        Ok(Self { mu : select_row(&self.mu, k)?, std : select_row(&self.std, k)? })
    }

    fn log_prob(&self, x : &DVector<f64>) -> Result<f64, ConjugateError> {
        check_single(self.batch_size())?;
        check_shape("continuous dimensions", self.n_dim(), x.nrows())?;
        let lp = x.iter()
            .zip(self.mu.iter().zip(self.std.iter()))
            .map(|(x, (mu, std))| dnorm_std((x - mu) / std, std.ln()) )
            .sum();
        Ok(lp)
    }

}
