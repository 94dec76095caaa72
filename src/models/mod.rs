//! Models of the classification pipeline.
//!
//! A model couples preprocessing, an inference engine and postprocessing
//! into one callable unit.

pub mod classification;

pub use classification::*;
