//! Solution cost evaluation and deviation reporting.

mod deviation;
mod evaluator;

pub use deviation::{absolute_percent_deviation, percent_deviation};
pub use evaluator::Evaluator;
