use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use tracing::trace;
use super::*;
use super::dens::{self, ddirichlet_ln, logsumexp};
use crate::batch::{Matrices, broadcast_len, broadcast_row};
use crate::error::*;
use crate::stats::CategoryCounts;

/// Dirichlet prior over the category probabilities of each discrete dimension. Each batch entry
/// is a (n_dim x n_categories) table of concentrations, one dirichlet per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dirichlet {
    alpha : Matrices
}

impl<'de> Deserialize<'de> for Dirichlet {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            alpha : Matrices
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.alpha).map_err(de::Error::custom)
    }

}

impl Dirichlet {

    pub fn new(alpha : Matrices) -> Result<Self, ConjugateError> {
        check_positive("alpha", alpha.iter())?;
        Ok(Self { alpha })
    }

    /// Single-entry batch from a (n_dim x n_categories) table of concentrations.
    pub fn from_matrix(alpha : DMatrix<f64>) -> Result<Self, ConjugateError> {
        Self::new(Matrices::single(alpha))
    }

    /// Single-entry batch with all concentrations set at alpha.
    pub fn symmetric(n_dim : usize, n_categories : usize, alpha : f64) -> Result<Self, ConjugateError> {
        Self::new(Matrices::from_element(n_dim, n_categories, 1, alpha))
    }

    pub fn alpha(&self) -> &Matrices {
        &self.alpha
    }

    pub fn n_dim(&self) -> usize {
        self.alpha.slice_nrows()
    }

    pub fn n_categories(&self) -> usize {
        self.alpha.slice_ncols()
    }

    pub fn batch_size(&self) -> usize {
        self.alpha.nslices()
    }

    /// Returns a single-entry batch with the concentrations at entry k.
    pub fn index(&self, k : usize) -> Result<Self, ConjugateError> {
        Ok(Self { alpha : self.alpha.select(k)? })
    }

}

impl Conjugate for Dirichlet {

    type Likelihood = Categorical;

    type Stat = CategoryCounts;

    type Observations = DMatrix<usize>;

    fn stat(&self, y : &DMatrix<usize>) -> Result<CategoryCounts, ConjugateError> {
        check_shape("discrete dimensions", self.n_dim(), y.ncols())?;
        CategoryCounts::from_sample(y, self.n_categories())
    }

    fn grouped_stat(
        &self,
        y : &DMatrix<usize>,
        c : &[usize],
        max_clusters : Option<usize>
    ) -> Result<CategoryCounts, ConjugateError> {
        check_shape("discrete dimensions", self.n_dim(), y.ncols())?;
        CategoryCounts::grouped(y, c, self.n_categories(), max_clusters)
    }

    /// alpha' = alpha + counts, for every cluster of the statistic.
    fn update(&self, t : &CategoryCounts) -> Result<Self, ConjugateError> {
        let counts = t.counts();
        check_shape("discrete dimensions", self.n_dim(), counts.slice_nrows())?;
        check_shape("categories", self.n_categories(), counts.slice_ncols())?;
        broadcast_len("posterior clusters", counts.nslices(), self.batch_size())?;
        let alpha = if self.batch_size() == 1 || self.batch_size() == counts.nslices() {
            self.alpha.broadcast_add(counts)?
        } else {
            counts.broadcast_add(&self.alpha)?
        };
        trace!(n_clusters = alpha.nslices(), n_dim = self.n_dim(), "dirichlet update");
        Ok(Self { alpha })
    }

    /// Draws each row as normalized log-gamma variates, so the categorical is built
    /// in log-space and small concentrations do not produce zero probabilities.
    fn sample(&self, key : Key) -> Categorical {
        let mut rng = key.rng();
        let mut logprobs = Matrices::zeros(self.n_dim(), self.n_categories(), self.batch_size());
        for k in 0..self.batch_size() {
            let alpha = self.alpha.slice(k);
            let mut table = logprobs.slice_mut(k);
            for i in 0..alpha.nrows() {
                for j in 0..alpha.ncols() {
                    table[(i, j)] = dens::log_gamma_draw(&mut rng, alpha[(i, j)]);
                }
                let row : Vec<f64> = table.row(i).iter().cloned().collect();
                let norm = logsumexp(&row[..]);
                table.row_mut(i).iter_mut().for_each(|lp| *lp -= norm );
            }
        }
        Categorical::from_normalized(logprobs)
    }

    /// Sum over dimensions of the dirichlet log-density of each row of probabilities.
    fn log_prob(&self, theta : &Categorical) -> Result<f64, ConjugateError> {
        check_shape("discrete dimensions", self.n_dim(), theta.n_dim())?;
        check_shape("categories", self.n_categories(), theta.n_categories())?;
        let nrows = broadcast_len("categorical batch", theta.batch_size(), self.batch_size())?;
        let mut lp = 0.0;
        for k in 0..nrows {
            let alpha = self.alpha.slice(broadcast_row(self.batch_size(), k));
            let logprobs = theta.logprobs().slice(broadcast_row(theta.batch_size(), k));
            for (a_row, p_row) in alpha.row_iter().zip(logprobs.row_iter()) {
                lp += ddirichlet_ln(p_row.iter().cloned(), a_row.iter().cloned());
            }
        }
        Ok(lp)
    }

}
