use thiserror::Error;

/// Failures raised by the conjugate algebra. Nothing here is retried: every operation is a pure
/// function of its arguments, so the error is returned to the caller as soon as it is detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConjugateError {

    /// Dimensions of a prior and its data (or of two parameter arrays) do not agree.
    #[error("Shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch { what : &'static str, expected : usize, found : usize },

    /// Hyperparameter outside the distribution domain.
    #[error("Informed parameter {name} = {value} outside distribution domain")]
    InvalidParameter { name : &'static str, value : f64 },

    /// Cluster label (or batch index) outside [0, bound).
    #[error("Cluster label {label} outside [0, {bound})")]
    InvalidLabel { label : usize, bound : usize },

    /// Discrete observation outside [0, n_categories).
    #[error("Category {category} at dimension {dim} outside [0, {n_categories})")]
    CategoryIndexOutOfRange { category : usize, dim : usize, n_categories : usize },

    /// A prior, feature or datapoint of one family was combined with another family.
    #[error("Expected {expected} but found {found}")]
    FamilyMismatch { expected : &'static str, found : &'static str }

}

impl ConjugateError {

    pub(crate) fn shape(what : &'static str, expected : usize, found : usize) -> Self {
        ConjugateError::ShapeMismatch { what, expected, found }
    }

    pub(crate) fn param(name : &'static str, value : f64) -> Self {
        ConjugateError::InvalidParameter { name, value }
    }

}

/// Returns an error if the informed dimension is not the expected one.
pub(crate) fn check_shape(what : &'static str, expected : usize, found : usize) -> Result<(), ConjugateError> {
    if expected == found {
        Ok(())
    } else {
        Err(ConjugateError::shape(what, expected, found))
    }
}

/// Verifies all entries of the iterator are strictly positive (NaN is rejected as well).
pub(crate) fn check_positive<'a>(
    name : &'static str,
    vals : impl IntoIterator<Item=&'a f64>
) -> Result<(), ConjugateError> {
    for v in vals {
        if !(*v > 0.0) {
            return Err(ConjugateError::param(name, *v));
        }
    }
    Ok(())
}
