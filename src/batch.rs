use nalgebra::*;
use serde::{Serialize, Deserialize, Deserializer, de};
use crate::error::*;

/// Stack of equally-sized matrices, used instead of a rank-3 tensor. Each matrix is stored by
/// concatenating it horizontally with the previous one, resulting in one wide matrix; individual
/// access is provided by slice(.) and slice_mut(.). For the discrete families every slice is
/// a (n_dim x n_categories) table, and the stack runs over clusters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrices {

    mats : DMatrix<f64>,

    slice_ncol : usize

}

impl<'de> Deserialize<'de> for Matrices {

    fn deserialize<D>(deserializer : D) -> Result<Self, D::Error>
    where
        D : Deserializer<'de>
    {
        #[derive(Deserialize)]
        struct Fields {
            mats : DMatrix<f64>,
            slice_ncol : usize
        }
        let f = Fields::deserialize(deserializer)?;
        Self::from_parts(f.mats, f.slice_ncol).map_err(de::Error::custom)
    }

}

impl Matrices {

    pub fn zeros(nrow : usize, ncol : usize, nslice : usize) -> Self {
        Self { mats : DMatrix::zeros(nrow, ncol*nslice), slice_ncol : ncol }
    }

    pub fn from_element(nrow : usize, ncol : usize, nslice : usize, val : f64) -> Self {
        Self { mats : DMatrix::from_element(nrow, ncol*nslice, val), slice_ncol : ncol }
    }

    /// Stacks the informed slices, which must all share the same shape.
    pub fn from_slices(slices : &[DMatrix<f64>]) -> Result<Self, ConjugateError> {
        let (nrow, ncol) = match slices.first() {
            Some(s) => s.shape(),
            None => return Err(ConjugateError::shape("matrix stack", 1, 0))
        };
        let mut out = Self::zeros(nrow, ncol, slices.len());
        for (i, s) in slices.iter().enumerate() {
            check_shape("matrix stack rows", nrow, s.nrows())?;
            check_shape("matrix stack columns", ncol, s.ncols())?;
            out.slice_mut(i).copy_from(s);
        }
        Ok(out)
    }

    /// Interprets a wide matrix as consecutive slices of slice_ncol columns each.
    pub fn from_parts(mats : DMatrix<f64>, slice_ncol : usize) -> Result<Self, ConjugateError> {
        let whole = if slice_ncol == 0 {
            mats.ncols() == 0
        } else {
            mats.ncols() % slice_ncol == 0
        };
        if !whole {
            return Err(ConjugateError::shape("matrix stack columns", slice_ncol, mats.ncols()));
        }
        Ok(Self { mats, slice_ncol })
    }

    /// A stack holding a single matrix.
    pub fn single(mat : DMatrix<f64>) -> Self {
        let slice_ncol = mat.ncols();
        Self { mats : mat, slice_ncol }
    }

    pub fn nslices(&self) -> usize {
        if self.slice_ncol == 0 {
            0
        } else {
            self.mats.ncols() / self.slice_ncol
        }
    }

    pub fn slice_nrows(&self) -> usize {
        self.mats.nrows()
    }

    pub fn slice_ncols(&self) -> usize {
        self.slice_ncol
    }

    pub fn slice(&self, i : usize) -> DMatrixSlice<f64> {
        self.mats.columns(self.slice_ncol*i, self.slice_ncol)
    }

    pub fn slice_mut(&mut self, i : usize) -> DMatrixSliceMut<f64> {
        self.mats.columns_mut(self.slice_ncol*i, self.slice_ncol)
    }

    /// Copies the ith slice into a new single-slice stack.
    pub fn select(&self, i : usize) -> Result<Self, ConjugateError> {
        if i >= self.nslices() {
            return Err(ConjugateError::InvalidLabel { label : i, bound : self.nslices() });
        }
        Ok(Self::single(self.slice(i).clone_owned()))
    }

    /// Iterates over all stored entries, slice after slice.
    pub fn iter(&self) -> impl Iterator<Item=&f64> {
        self.mats.iter()
    }

    pub fn map(&self, f : impl FnMut(f64)->f64) -> Self {
        Self { mats : self.mats.map(f), slice_ncol : self.slice_ncol }
    }

    /// Elementwise sum, broadcasting self over other when self holds a single slice.
    pub fn broadcast_add(&self, other : &Matrices) -> Result<Self, ConjugateError> {
        check_shape("stacked rows", self.slice_nrows(), other.slice_nrows())?;
        check_shape("stacked columns", self.slice_ncols(), other.slice_ncols())?;
        let n = other.nslices();
        if self.nslices() == n {
            return Ok(Self { mats : &self.mats + &other.mats, slice_ncol : self.slice_ncol });
        }
        check_shape("stacked slices", 1, self.nslices())?;
        let mut out = other.clone();
        for i in 0..n {
            let mut s = out.slice_mut(i);
            s += self.slice(0);
        }
        Ok(out)
    }

}

/// Index of the row of a batched parameter matrix to pair with the ith element of a batch of
/// size n. Single-row parameters broadcast over every batch element.
pub(crate) fn broadcast_row(nrows : usize, i : usize) -> usize {
    if nrows == 1 {
        0
    } else {
        i
    }
}

/// Resolves the batch size of a (possibly broadcast) pairing of two batched values.
pub(crate) fn broadcast_len(what : &'static str, a : usize, b : usize) -> Result<usize, ConjugateError> {
    if a == b || b == 1 {
        Ok(a)
    } else if a == 1 {
        Ok(b)
    } else {
        Err(ConjugateError::shape(what, a, b))
    }
}

/// Copies row i of a batched parameter matrix into a single-row matrix.
pub(crate) fn select_row(m : &DMatrix<f64>, i : usize) -> Result<DMatrix<f64>, ConjugateError> {
    if i >= m.nrows() {
        return Err(ConjugateError::InvalidLabel { label : i, bound : m.nrows() });
    }
    Ok(m.rows(i, 1).clone_owned())
}
