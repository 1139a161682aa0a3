//! Reader for reference solution files (`.sol`).

use std::path::Path;

use super::instance::parse_number;
use crate::error::ParseError;

/// Parses the reference cost from a solution file.
///
/// Takes the first line starting with `Cost` and reads its last token.
///
/// # Errors
///
/// [`ParseError::MissingCost`] if there is no such line,
/// [`ParseError::InvalidNumber`] if its value is not numeric.
///
/// # Examples
///
/// ```
/// use u_cvrp::tsplib::parse_reference_cost;
///
/// let text = "Route #1: 21 31 19\nRoute #2: 28 25\nCost 784\n";
/// assert_eq!(parse_reference_cost(text).unwrap(), 784.0);
/// ```
pub fn parse_reference_cost(text: &str) -> Result<f64, ParseError> {
    let (idx, line) = text
        .lines()
        .enumerate()
        .find(|(_, line)| line.trim_start().starts_with("Cost"))
        .ok_or(ParseError::MissingCost)?;
    let token = line
        .trim_start()
        .trim_start_matches("Cost")
        .split(|c: char| c.is_whitespace() || c == ':')
        .rfind(|t| !t.is_empty())
        .ok_or(ParseError::MissingCost)?;
    parse_number(token, idx + 1)
}

/// Reads and parses a reference solution file.
///
/// # Errors
///
/// [`ParseError::Io`] if the file cannot be read, otherwise as
/// [`parse_reference_cost`].
pub fn read_reference_cost(path: impl AsRef<Path>) -> Result<f64, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_reference_cost(&text)
}
