use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use super::*;
use super::dens::logsumexp;
use crate::batch::Matrices;
use crate::error::*;

// Tolerance on the log-normalizer of each row.
const NORM_TOL : f64 = 1E-6;

/// Per-dimension categorical likelihood, stored as log-probabilities. Each batch entry is a
/// (n_dim x n_categories) table whose rows are normalized. Dimensions with fewer categories
/// than n_categories are padded with zero-probability (negative infinity) entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Categorical {
    logprobs : Matrices
}

impl<'de> Deserialize<'de> for Categorical {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            logprobs : Matrices
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.logprobs).map_err(de::Error::custom)
    }

}

impl Categorical {

    pub fn new(logprobs : Matrices) -> Result<Self, ConjugateError> {
        for i in 0..logprobs.nslices() {
            for row in logprobs.slice(i).row_iter() {
                let row : Vec<f64> = row.iter().cloned().collect();
                let norm = logsumexp(&row[..]);
                if !(norm.abs() < NORM_TOL) {
                    return Err(ConjugateError::param("categorical log-normalizer", norm));
                }
            }
        }
        Ok(Self { logprobs })
    }

    /// Single-entry batch from a (n_dim x n_categories) table of probabilities.
    pub fn from_probs(probs : &DMatrix<f64>) -> Result<Self, ConjugateError> {
        Self::new(Matrices::single(probs.map(|p| p.ln() )))
    }

    pub fn logprobs(&self) -> &Matrices {
        &self.logprobs
    }

    pub fn n_dim(&self) -> usize {
        self.logprobs.slice_nrows()
    }

    pub fn n_categories(&self) -> usize {
        self.logprobs.slice_ncols()
    }

    // Assumes rows were normalized by the caller (draws from a dirichlet are normalized in log-space).
    pub(crate) fn from_normalized(logprobs : Matrices) -> Self {
        Self { logprobs }
    }

}

impl Likelihood for Categorical {

    type Point = DVector<usize>;

    fn batch_size(&self) -> usize {
        self.logprobs.nslices()
    }

    fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        Ok(Self { logprobs : self.logprobs.select(k)? })
    }

    fn log_prob(&self, x : &DVector<usize>) -> Result<f64, ConjugateError> {
        check_single(self.batch_size())?;
        check_shape("discrete dimensions", self.n_dim(), x.nrows())?;
        let table = self.logprobs.slice(0);
        let n_categories = self.n_categories();
        let mut lp = 0.0;
        for (dim, cat) in x.iter().enumerate() {
            if *cat >= n_categories {
                return Err(ConjugateError::CategoryIndexOutOfRange { category : *cat, dim, n_categories });
            }
            lp += table[(dim, *cat)];
        }
        Ok(lp)
    }

}
