//! permtest-linalg: Linear algebra for permtest-rs
//!
//! Dense matrices over faer, thin QR and numerical rank, projection
//! (hat) matrices, Gower centering and pairwise distances used by the
//! MDMR engine and the built-in independence tests.

pub mod decomposition;
pub mod dense;
pub mod distance;
pub mod projection;

pub use decomposition::LinalgError;
pub use dense::DenseMatrix;
pub use distance::DistanceMetric;
