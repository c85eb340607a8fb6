/// Conjugate parameter types (Normal-Inverse-Gamma/Normal, Dirichlet/Categorical and their
/// mixed-feature composition), the stick-breaking GEM prior over mixture weights, and the
/// Conjugate/Likelihood traits through which they are updated, sampled and evaluated.
pub mod prob;

/// Grouped-by-cluster sufficient statistics: counts, sums and sums of squares for
/// continuous features; one-hot category counts for discrete features.
pub mod stats;

/// Tagged variants over the distribution families (Prior, Feature, Datapoint, Observations),
/// the cluster assignment and full model state, and JSON model definitions.
pub mod model;

/// Splittable random source consumed by all sampling routines.
pub mod key;

/// Stacks of equally-sized matrices, used to batch the discrete families over clusters.
pub mod batch;

mod error;

pub use error::ConjugateError;

pub use key::Key;
