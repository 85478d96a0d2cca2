//! permtest-data: Sample and matrix I/O for permtest-rs
//!
//! Provides the SampleStore trait for pre-generated power-simulation
//! data, a MATLAB `.mat` backed repository implementing it, and plain
//! text matrix files for MDMR inputs and results.

pub mod matlab;
pub mod repository;
pub mod sample_array;
pub mod text;
pub mod traits;

pub use repository::SampleRepository;
pub use sample_array::SampleArray;
pub use traits::{DataAxis, SampleStore};
