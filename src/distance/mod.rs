//! Distance model.
//!
//! Provides the precomputed, symmetric distance table shared by every phase.

mod matrix;

pub use matrix::DistanceMatrix;
