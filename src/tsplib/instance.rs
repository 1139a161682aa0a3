//! Reader for CVRP instance files.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::ParseError;
use crate::models::{Instance, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Coords,
    Demands,
    Depot,
    Skipped,
}

/// Extracts the fleet size from an instance name such as `A-n32-k5`.
///
/// Looks for a `-`, `_` or `.` separated token made of `k` followed by digits.
///
/// # Examples
///
/// ```
/// use u_cvrp::tsplib::fleet_size_from_name;
///
/// assert_eq!(fleet_size_from_name("A-n32-k5"), Some(5));
/// assert_eq!(fleet_size_from_name("P-n101-k4.vrp"), Some(4));
/// assert_eq!(fleet_size_from_name("E-n13"), None);
/// ```
pub fn fleet_size_from_name(name: &str) -> Option<usize> {
    name.split(['-', '_', '.', '/', '\\'])
        .filter_map(|token| token.strip_prefix(['k', 'K']))
        .find(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
}

/// Parses a CVRP instance in the TSPLIB-style text format.
///
/// Reads `NAME`, `DIMENSION`, `CAPACITY`, `NODE_COORD_SECTION`,
/// `DEMAND_SECTION`, and `DEPOT_SECTION`; other keywords and sections are
/// skipped. File ids are 1-based and become 0-based node ids. Distances are
/// plain Euclidean, without TSPLIB rounding.
///
/// When `max_vehicles` is `None`, the fleet size comes from the `k<count>`
/// token of `NAME`.
///
/// # Errors
///
/// A [`ParseError`] naming the missing section or the offending line.
///
/// # Examples
///
/// ```
/// use u_cvrp::tsplib::parse_instance;
///
/// let text = "\
/// NAME : T-n4-k1
/// CAPACITY : 3
/// NODE_COORD_SECTION
/// 1 0 0
/// 2 1 0
/// 3 2 0
/// 4 3 0
/// DEMAND_SECTION
/// 1 0
/// 2 1
/// 3 1
/// 4 1
/// DEPOT_SECTION
/// 1
/// -1
/// EOF
/// ";
/// let instance = parse_instance(text, None).unwrap();
/// assert_eq!(instance.name(), Some("T-n4-k1"));
/// assert_eq!(instance.max_vehicles(), 1);
/// assert_eq!(instance.depot(), 0);
/// assert_eq!(instance.customers(), &[1, 2, 3]);
/// ```
pub fn parse_instance(text: &str, max_vehicles: Option<usize>) -> Result<Instance, ParseError> {
    parse_with_fallback(text, max_vehicles, None)
}

/// Reads and parses a CVRP instance file.
///
/// Like [`parse_instance`], but when neither `max_vehicles` nor `NAME`
/// gives the fleet size, the file stem is tried as well.
///
/// # Errors
///
/// [`ParseError::Io`] if the file cannot be read, otherwise as
/// [`parse_instance`].
pub fn read_instance(
    path: impl AsRef<Path>,
    max_vehicles: Option<usize>,
) -> Result<Instance, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let stem = path.file_stem().and_then(|s| s.to_str());
    parse_with_fallback(&text, max_vehicles, stem)
}

fn parse_with_fallback(
    text: &str,
    max_vehicles: Option<usize>,
    stem: Option<&str>,
) -> Result<Instance, ParseError> {
    let mut name: Option<String> = None;
    let mut dimension: Option<usize> = None;
    let mut capacity: Option<u32> = None;
    let mut coords: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
    let mut demands: BTreeMap<usize, u32> = BTreeMap::new();
    let mut depot: Option<usize> = None;
    let mut saw_demands = false;
    let mut saw_depot = false;
    let mut section = Section::Header;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(keyword) = keyword_of(line) {
            section = match keyword {
                "NODE_COORD_SECTION" => Section::Coords,
                "DEMAND_SECTION" => {
                    saw_demands = true;
                    Section::Demands
                }
                "DEPOT_SECTION" => {
                    saw_depot = true;
                    Section::Depot
                }
                "EOF" => break,
                k if k.ends_with("_SECTION") => Section::Skipped,
                _ => {
                    let value = header_value(line);
                    match keyword {
                        "NAME" => name = Some(value.to_string()),
                        "DIMENSION" => dimension = Some(parse_number(value, line_no)?),
                        "CAPACITY" => capacity = Some(parse_number(value, line_no)?),
                        _ => {}
                    }
                    Section::Header
                }
            };
            continue;
        }

        match section {
            Section::Coords => {
                let [id, x, y] = fields::<3>(line, line_no)?;
                let id = node_id(id, line, line_no)?;
                coords.insert(id, (parse_number(x, line_no)?, parse_number(y, line_no)?));
            }
            Section::Demands => {
                let [id, demand] = fields::<2>(line, line_no)?;
                let id = node_id(id, line, line_no)?;
                if !coords.contains_key(&id) {
                    return Err(ParseError::UnknownNode {
                        line: line_no,
                        node: id,
                    });
                }
                demands.insert(id, parse_number(demand, line_no)?);
            }
            Section::Depot => {
                for token in line.split_whitespace() {
                    let value: i64 = parse_number(token, line_no)?;
                    if value == -1 {
                        section = Section::Skipped;
                        break;
                    }
                    if depot.is_some() {
                        // Single-depot format: later entries are ignored.
                        continue;
                    }
                    let id = node_id(token, line, line_no)?;
                    if !coords.contains_key(&id) {
                        return Err(ParseError::UnknownNode {
                            line: line_no,
                            node: id,
                        });
                    }
                    depot = Some(id);
                }
            }
            Section::Header => {
                return Err(ParseError::MalformedLine {
                    line: line_no,
                    content: line.to_string(),
                });
            }
            Section::Skipped => {}
        }
    }

    if coords.is_empty() {
        return Err(ParseError::MissingSection("NODE_COORD_SECTION"));
    }
    if !saw_demands {
        return Err(ParseError::MissingSection("DEMAND_SECTION"));
    }
    if !saw_depot {
        return Err(ParseError::MissingSection("DEPOT_SECTION"));
    }
    let depot = depot.ok_or(ParseError::MissingSection("DEPOT_SECTION"))?;
    let capacity = capacity.ok_or(ParseError::MissingSection("CAPACITY"))?;
    if let Some(declared) = dimension {
        if declared != coords.len() {
            return Err(ParseError::DimensionMismatch {
                declared,
                found: coords.len(),
            });
        }
    }

    let max_vehicles = max_vehicles
        .or_else(|| name.as_deref().and_then(fleet_size_from_name))
        .or_else(|| stem.and_then(fleet_size_from_name))
        .ok_or(ParseError::MissingFleetSize)?;

    let mut nodes = Vec::with_capacity(coords.len());
    for (&id, &(x, y)) in &coords {
        let demand = *demands
            .get(&id)
            .ok_or(ParseError::MissingDemand { node: id })?;
        nodes.push(Node::new(id - 1, x, y, demand));
    }

    let mut instance = Instance::new(nodes, depot - 1, capacity, max_vehicles)?;
    if let Some(name) = name {
        instance = instance.with_name(name);
    }

    debug!(
        name = instance.name(),
        nodes = instance.nodes().len(),
        capacity,
        max_vehicles,
        "parsed CVRP instance"
    );

    Ok(instance)
}

/// Returns the keyword if the line starts with one (`NAME : x`, `EOF`, `DEMAND_SECTION`).
fn keyword_of(line: &str) -> Option<&str> {
    let head = line
        .split(|c: char| c == ':' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    let is_keyword = !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit())
        && head.starts_with(|c: char| c.is_ascii_uppercase());
    is_keyword.then_some(head)
}

/// Value part of a `KEY : value` header line.
fn header_value(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, value)) => value.trim(),
        None => line
            .split_once(char::is_whitespace)
            .map(|(_, v)| v.trim())
            .unwrap_or_default(),
    }
}

fn fields<const N: usize>(line: &str, line_no: usize) -> Result<[&str; N], ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.try_into().map_err(|_| ParseError::MalformedLine {
        line: line_no,
        content: line.to_string(),
    })
}

fn node_id(token: &str, line: &str, line_no: usize) -> Result<usize, ParseError> {
    let id: usize = parse_number(token, line_no)?;
    if id == 0 {
        return Err(ParseError::MalformedLine {
            line: line_no,
            content: line.to_string(),
        });
    }
    Ok(id)
}

pub(super) fn parse_number<T: std::str::FromStr>(token: &str, line_no: usize) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidNumber {
        line: line_no,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstanceError;

    const SMALL: &str = "\
NAME : P-n5-k2
COMMENT : (hand made, No of trucks: 2)
TYPE : CVRP
DIMENSION : 5
EDGE_WEIGHT_TYPE : EUC_2D
CAPACITY : 10
NODE_COORD_SECTION
 1 30 40
 2 37 52
 3 49 49
 4 52 64
 5 20 26
DEMAND_SECTION
1 0
2 7
3 3
4 5
5 4
DEPOT_SECTION
 1
 -1
EOF
";

    #[test]
    fn test_parse_small() {
        let inst = parse_instance(SMALL, None).expect("valid");
        assert_eq!(inst.name(), Some("P-n5-k2"));
        assert_eq!(inst.max_vehicles(), 2);
        assert_eq!(inst.capacity(), 10);
        assert_eq!(inst.depot(), 0);
        assert_eq!(inst.customers(), &[1, 2, 3, 4]);
        assert_eq!(inst.demand(1), 7);
        assert_eq!(inst.demand(4), 4);
        let n2 = &inst.nodes()[1];
        assert_eq!((n2.x(), n2.y()), (37.0, 52.0));
        // d(1, 2) = sqrt(7² + 12²)
        assert!((inst.distances().get(0, 1) - 193f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_explicit_fleet_size_wins() {
        let inst = parse_instance(SMALL, Some(4)).expect("valid");
        assert_eq!(inst.max_vehicles(), 4);
    }

    #[test]
    fn test_fleet_size_from_name() {
        assert_eq!(fleet_size_from_name("A-n32-k5"), Some(5));
        assert_eq!(fleet_size_from_name("X-n101-k25"), Some(25));
        assert_eq!(fleet_size_from_name("data/M/M-n101-k10.vrp"), Some(10));
        assert_eq!(fleet_size_from_name("kroA100"), None);
        assert_eq!(fleet_size_from_name("E-n13-k"), None);
    }

    #[test]
    fn test_missing_fleet_size() {
        let text = SMALL.replace("P-n5-k2", "P-n5");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::MissingFleetSize)
        ));
    }

    #[test]
    fn test_missing_capacity() {
        let text = SMALL.replace("CAPACITY : 10\n", "");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::MissingSection("CAPACITY"))
        ));
    }

    #[test]
    fn test_missing_depot_section() {
        let text = SMALL.replace("DEPOT_SECTION\n 1\n -1\n", "");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::MissingSection("DEPOT_SECTION"))
        ));
    }

    #[test]
    fn test_missing_demand_entry() {
        let text = SMALL.replace("5 4\n", "");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::MissingDemand { node: 5 })
        ));
    }

    #[test]
    fn test_demand_for_unknown_node() {
        let text = SMALL.replace("5 4\n", "5 4\n9 1\n");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::UnknownNode { node: 9, .. })
        ));
    }

    #[test]
    fn test_invalid_number() {
        let text = SMALL.replace("3 49 49", "3 4x9 49");
        match parse_instance(&text, None) {
            Err(ParseError::InvalidNumber { line, token }) => {
                assert_eq!(line, 10);
                assert_eq!(token, "4x9");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_coordinate_line() {
        let text = SMALL.replace("3 49 49", "3 49");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::MalformedLine { line: 10, .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let text = SMALL.replace("DIMENSION : 5", "DIMENSION : 6");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::DimensionMismatch {
                declared: 6,
                found: 5
            })
        ));
    }

    #[test]
    fn test_gap_in_ids_is_instance_error() {
        let text = SMALL.replace(" 5 20 26", " 6 20 26").replace("5 4\n", "6 4\n");
        let text = text.replace("DIMENSION : 5\n", "");
        assert!(matches!(
            parse_instance(&text, None),
            Err(ParseError::Instance(InstanceError::NonContiguousId { .. }))
        ));
    }

    #[test]
    fn test_depot_other_than_first_node() {
        let text = SMALL
            .replace("DEPOT_SECTION\n 1\n", "DEPOT_SECTION\n 3\n")
            .replace("1 0\n2 7\n3 3\n", "1 2\n2 7\n3 0\n");
        let inst = parse_instance(&text, None).expect("valid");
        assert_eq!(inst.depot(), 2);
        assert_eq!(inst.customers(), &[0, 1, 3, 4]);
    }

    #[test]
    fn test_read_instance_uses_file_stem() {
        let dir = std::env::temp_dir().join(format!("u-cvrp-parse-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("Q-n5-k3.vrp");
        std::fs::write(&path, SMALL.replace("NAME : P-n5-k2\n", "")).expect("write");
        let inst = read_instance(&path, None).expect("valid");
        assert_eq!(inst.max_vehicles(), 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_instance("/nonexistent/u-cvrp/X-n1-k1.vrp", None),
            Err(ParseError::Io(_))
        ));
    }
}
