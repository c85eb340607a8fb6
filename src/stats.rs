use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use tracing::trace;
use crate::batch::Matrices;
use crate::error::*;

/// Resolves the number of groups for a label vector and verifies every label falls inside it.
/// Without an explicit bound, the number of groups is one past the largest label.
fn n_segments(c : &[usize], max_clusters : Option<usize>) -> Result<usize, ConjugateError> {
    let k = match max_clusters {
        Some(k) => k,
        None => c.iter().max().map(|m| m + 1).unwrap_or(0)
    };
    if let Some(label) = c.iter().find(|l| **l >= k ) {
        return Err(ConjugateError::InvalidLabel { label : *label, bound : k });
    }
    Ok(k)
}

/// Sufficient statistics (count, sum and sum of squares per dimension) of a continuous sample,
/// with one row per cluster. Rows for clusters without observations are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalStats {

    n : Vec<usize>,

    sum_x : DMatrix<f64>,

    sum_x_sq : DMatrix<f64>

}

impl<'de> Deserialize<'de> for NormalStats {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            n : Vec<usize>,
            sum_x : DMatrix<f64>,
            sum_x_sq : DMatrix<f64>
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.n, f.sum_x, f.sum_x_sq).map_err(de::Error::custom)
    }

}

impl NormalStats {

    pub fn new(n : Vec<usize>, sum_x : DMatrix<f64>, sum_x_sq : DMatrix<f64>) -> Result<Self, ConjugateError> {
        check_shape("sum rows", n.len(), sum_x.nrows())?;
        check_shape("sum of squares rows", n.len(), sum_x_sq.nrows())?;
        check_shape("sum of squares columns", sum_x.ncols(), sum_x_sq.ncols())?;
        Ok(Self { n, sum_x, sum_x_sq })
    }

    /// Statistics of a single group.
    pub fn single(n : usize, sum_x : &[f64], sum_x_sq : &[f64]) -> Result<Self, ConjugateError> {
        Self::new(
            vec![n],
            DMatrix::from_row_slice(1, sum_x.len(), sum_x),
            DMatrix::from_row_slice(1, sum_x_sq.len(), sum_x_sq)
        )
    }

    /// Collapses the sample y (observations over rows, dimensions over columns)
    /// into the statistics of a single group.
    pub fn from_sample(y : &DMatrix<f64>) -> Self {
        let d = y.ncols();
        let mut sum_x = DMatrix::zeros(1, d);
        let mut sum_x_sq = DMatrix::zeros(1, d);
        for row in y.row_iter() {
            for (j, v) in row.iter().enumerate() {
                sum_x[(0, j)] += v;
                sum_x_sq[(0, j)] += v * v;
            }
        }
        Self { n : vec![y.nrows()], sum_x, sum_x_sq }
    }

    /// Group-by-label reduction of the sample y. The output always has max_clusters rows
    /// (or one past the largest label when no bound is informed), whatever labels are present.
    pub fn grouped(
        y : &DMatrix<f64>,
        c : &[usize],
        max_clusters : Option<usize>
    ) -> Result<Self, ConjugateError> {
        check_shape("cluster labels", y.nrows(), c.len())?;
        let k = n_segments(c, max_clusters)?;
        let d = y.ncols();
        let mut n = vec![0; k];
        let mut sum_x = DMatrix::zeros(k, d);
        let mut sum_x_sq = DMatrix::zeros(k, d);
        for (row, label) in y.row_iter().zip(c.iter()) {
            n[*label] += 1;
            for (j, v) in row.iter().enumerate() {
                sum_x[(*label, j)] += v;
                sum_x_sq[(*label, j)] += v * v;
            }
        }
        trace!(n_obs = y.nrows(), n_clusters = k, n_dim = d, "grouped normal statistics");
        Ok(Self { n, sum_x, sum_x_sq })
    }

    pub fn n_clusters(&self) -> usize {
        self.n.len()
    }

    pub fn n_dim(&self) -> usize {
        self.sum_x.ncols()
    }

    pub fn counts(&self) -> &[usize] {
        &self.n[..]
    }

    pub fn sum_x(&self) -> &DMatrix<f64> {
        &self.sum_x
    }

    pub fn sum_x_sq(&self) -> &DMatrix<f64> {
        &self.sum_x_sq
    }

    /// Statistics of the union of two samples with the same grouping.
    pub fn merge(&self, other : &NormalStats) -> Result<Self, ConjugateError> {
        check_shape("merged clusters", self.n_clusters(), other.n_clusters())?;
        check_shape("merged dimensions", self.n_dim(), other.n_dim())?;
        Ok(Self {
            n : self.n.iter().zip(other.n.iter()).map(|(a, b)| a + b ).collect(),
            sum_x : &self.sum_x + &other.sum_x,
            sum_x_sq : &self.sum_x_sq + &other.sum_x_sq
        })
    }

}

/// Per-cluster category counts of a discrete sample: one (n_dim x n_categories) table per cluster,
/// where entry (i, j) counts the observations with category j at dimension i.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCounts {
    counts : Matrices
}

impl<'de> Deserialize<'de> for CategoryCounts {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            counts : Matrices
        }
        let f = Fields::deserialize(deserializer)?;
        Self::new(f.counts).map_err(de::Error::custom)
    }

}

impl CategoryCounts {

    pub fn new(counts : Matrices) -> Result<Self, ConjugateError> {
        if let Some(c) = counts.iter().find(|c| !(**c >= 0.0) ) {
            return Err(ConjugateError::param("category count", *c));
        }
        Ok(Self { counts })
    }

    /// Counts of a single group.
    pub fn from_sample(y : &DMatrix<usize>, n_categories : usize) -> Result<Self, ConjugateError> {
        let c = vec![0; y.nrows()];
        Self::grouped(y, &c[..], n_categories, Some(1))
    }

    /// One-hot encodes every observation and sums the encodings by cluster label. The output
    /// holds exactly max_clusters tables (or one past the largest label), zero for empty clusters.
    pub fn grouped(
        y : &DMatrix<usize>,
        c : &[usize],
        n_categories : usize,
        max_clusters : Option<usize>
    ) -> Result<Self, ConjugateError> {
        check_shape("cluster labels", y.nrows(), c.len())?;
        let k = n_segments(c, max_clusters)?;
        let d = y.ncols();
        let mut counts = Matrices::zeros(d, n_categories, k);
        for (row, label) in y.row_iter().zip(c.iter()) {
            let mut table = counts.slice_mut(*label);
            for (dim, cat) in row.iter().enumerate() {
                if *cat >= n_categories {
                    return Err(ConjugateError::CategoryIndexOutOfRange { category : *cat, dim, n_categories });
                }
                table[(dim, *cat)] += 1.0;
            }
        }
        trace!(n_obs = y.nrows(), n_clusters = k, n_dim = d, n_categories, "grouped category counts");
        Ok(Self { counts })
    }

    pub fn counts(&self) -> &Matrices {
        &self.counts
    }

    pub fn n_clusters(&self) -> usize {
        self.counts.nslices()
    }

    pub fn merge(&self, other : &CategoryCounts) -> Result<Self, ConjugateError> {
        check_shape("merged clusters", self.n_clusters(), other.n_clusters())?;
        Ok(Self { counts : self.counts.broadcast_add(&other.counts)? })
    }

}
