//! Integer codes of patterns.
//!
//! A pattern with `n` nodes is a number of at most `2n²` bits. The low `n²`
//! bits are the green edges, the next `n²` bits the red edges; within a
//! color block bit `n·j + i` is set iff there is an edge `i → j`, so the
//! first `n` bits of a block are the incoming edges of node 0.
//!
//! When every node has a predecessor of each color the size is implied by
//! the bit length alone (more than `2n² − n` and at most `2n²` bits), which is
//! why codes travel without it in most places. The query functions below work
//! straight on `(n, code)` without building a [`Pattern`].

use crate::error::{LiftingError, Result};
use crate::pattern::{Color, Pattern};
use crate::relation::Relation;
use num_bigint::BigUint;
use std::fmt;
use std::str::FromStr;

#[inline]
fn block_offset(n: usize, color: Color) -> u64 {
    match color {
        Color::Green => 0,
        Color::Red => (n * n) as u64,
    }
}

/// Smallest `n` whose `2n²` bits can hold `code`.
pub fn number_of_nodes(code: &BigUint) -> usize {
    let bits = code.bits();
    let mut n = 1usize;
    while bits > 2 * (n * n) as u64 {
        n += 1;
    }
    n
}

/// Does the `n`-node pattern have a `color` edge `i → j`?
#[inline]
pub fn has_edge(n: usize, code: &BigUint, color: Color, i: usize, j: usize) -> bool {
    code.bit(block_offset(n, color) + (n * j + i) as u64)
}

pub fn has_green_edge(n: usize, code: &BigUint, i: usize, j: usize) -> bool {
    has_edge(n, code, Color::Green, i, j)
}

pub fn has_red_edge(n: usize, code: &BigUint, i: usize, j: usize) -> bool {
    has_edge(n, code, Color::Red, i, j)
}

pub fn successors(n: usize, code: &BigUint, color: Color, i: usize) -> Vec<usize> {
    (0..n).filter(|&j| has_edge(n, code, color, i, j)).collect()
}

pub fn predecessors(n: usize, code: &BigUint, color: Color, i: usize) -> Vec<usize> {
    (0..n).filter(|&j| has_edge(n, code, color, j, i)).collect()
}

pub fn get_green_successors(n: usize, code: &BigUint, i: usize) -> Vec<usize> {
    successors(n, code, Color::Green, i)
}

pub fn get_red_successors(n: usize, code: &BigUint, i: usize) -> Vec<usize> {
    successors(n, code, Color::Red, i)
}

pub fn get_green_predecessors(n: usize, code: &BigUint, i: usize) -> Vec<usize> {
    predecessors(n, code, Color::Green, i)
}

pub fn get_red_predecessors(n: usize, code: &BigUint, i: usize) -> Vec<usize> {
    predecessors(n, code, Color::Red, i)
}

/// `result[i]` lists the green successors of node `i`.
pub fn get_green_successor_lists(n: usize, code: &BigUint) -> Vec<Vec<usize>> {
    (0..n).map(|i| get_green_successors(n, code, i)).collect()
}

pub fn get_red_successor_lists(n: usize, code: &BigUint) -> Vec<Vec<usize>> {
    (0..n).map(|i| get_red_successors(n, code, i)).collect()
}

/// Normal-form test used to skip codes equivalent to one already checked:
/// no more red than green edges, and nodes ordered by (green out-degree,
/// red out-degree) descending.
pub fn is_normal_form(n: usize, code: &BigUint) -> bool {
    let count = |color: Color| {
        (0..n)
            .map(|i| successors(n, code, color, i).len())
            .collect::<Vec<_>>()
    };
    let green = count(Color::Green);
    let red = count(Color::Red);
    if red.iter().sum::<usize>() > green.iter().sum::<usize>() {
        return false;
    }
    (1..n).all(|i| (green[i - 1], red[i - 1]) >= (green[i], red[i]))
}

/// Converts the legacy layout, where bit `n·i + j` of a color block meant
/// `i → j`, into the current one.
pub fn old_code_to_new(n: usize, code: &BigUint) -> BigUint {
    let mut result = BigUint::default();
    for color in Color::BOTH {
        let base = block_offset(n, color);
        for j in 0..n {
            for k in 0..n {
                if code.bit(base + (n * k + j) as u64) {
                    result.set_bit(base + (n * j + k) as u64, true);
                }
            }
        }
    }
    result
}

/// Encodes a pattern as `(n, code)`. Total on all patterns; only encodable
/// ones ([`Pattern::is_encodable`]) come back unchanged from [`decode`].
pub fn encode(pattern: &Pattern) -> (usize, BigUint) {
    let n = pattern.num_nodes();
    let (_, mut code) = pattern.green().to_code();
    let (_, red) = pattern.red().to_code();
    code |= red << (n * n);
    (n, code)
}

/// Decodes an `n`-node pattern, rejecting codes that would not round-trip:
/// bits beyond `2n²`, or a node without a predecessor of some color.
pub fn decode(n: usize, code: &BigUint) -> Result<Pattern> {
    let bits = code.bits();
    let width = (n as u64).checked_mul(n as u64).and_then(|b| b.checked_mul(2));
    if width.is_some_and(|width| bits > width) {
        return Err(LiftingError::CodeTooLong { n, bits });
    }
    // the red predecessors of node n - 1 sit at bits 2n² - n and up
    if n > 0 && width.map_or(true, |width| bits <= width - n as u64) {
        return Err(LiftingError::MissingPredecessor {
            n,
            node: n - 1,
            color: Color::Red,
        });
    }
    let green = Relation::from_code(n, code);
    let red = Relation::from_code(n, &(code >> (n * n)));
    let pattern = Pattern::from_relations(green, red);
    for node in 0..n {
        for color in Color::BOTH {
            if pattern.predecessors(color, node).is_empty() {
                return Err(LiftingError::MissingPredecessor { n, node, color });
            }
        }
    }
    Ok(pattern)
}

/// Decodes a bare code, inferring `n` from its bit length.
pub fn decode_inferred(code: &BigUint) -> Result<Pattern> {
    if code.bits() == 0 {
        return Err(LiftingError::EmptyCode);
    }
    decode(number_of_nodes(code), code)
}

/// One line of a pattern-code stream: `<n>,<code>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeRecord {
    pub n: usize,
    pub code: BigUint,
}

impl CodeRecord {
    pub fn new(n: usize, code: BigUint) -> Self {
        CodeRecord { n, code }
    }

    pub fn from_pattern(pattern: &Pattern) -> Self {
        let (n, code) = encode(pattern);
        CodeRecord { n, code }
    }

    pub fn decode(&self) -> Result<Pattern> {
        decode(self.n, &self.code)
    }
}

impl FromStr for CodeRecord {
    type Err = LiftingError;

    fn from_str(line: &str) -> Result<Self> {
        let malformed = || LiftingError::MalformedRecord(line.to_string());
        let (n, code) = line.trim().split_once(',').ok_or_else(malformed)?;
        let n = n.trim().parse::<usize>().map_err(|_| malformed())?;
        let code = BigUint::from_str(code.trim()).map_err(|_| malformed())?;
        Ok(CodeRecord { n, code })
    }
}

impl fmt::Display for CodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.n, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn vierer() -> Pattern {
        Pattern::from_edge_lists(
            4,
            &[(0, 0), (0, 1), (1, 2), (1, 3), (2, 0), (3, 2)],
            &[(1, 1), (1, 2), (2, 0), (2, 2), (2, 3)],
        )
    }

    #[test]
    fn test_encode_vierer() {
        let (n, code) = encode(&vierer());
        assert_eq!(n, 4);
        assert_eq!(code, big(1176775189));
        assert_eq!(number_of_nodes(&code), 4);
        assert_eq!(decode(n, &code).unwrap(), vierer());
        assert_eq!(decode_inferred(&code).unwrap(), vierer());
    }

    #[test]
    fn test_edge_queries() {
        let code = big(1176775189);
        assert!(has_green_edge(4, &code, 0, 1));
        assert!(!has_green_edge(4, &code, 1, 0));
        assert!(has_red_edge(4, &code, 2, 3));
        assert_eq!(get_green_successors(4, &code, 1), vec![2, 3]);
        assert_eq!(get_red_successors(4, &code, 2), vec![0, 2, 3]);
        assert_eq!(get_green_predecessors(4, &code, 0), vec![0, 2]);
        assert_eq!(get_red_predecessors(4, &code, 2), vec![1, 2]);
        assert_eq!(
            get_green_successor_lists(4, &code),
            vec![vec![0, 1], vec![2, 3], vec![0], vec![2]]
        );
        assert_eq!(get_red_successor_lists(4, &code)[1], vec![1, 2]);
    }

    #[test]
    fn test_number_of_nodes() {
        assert_eq!(number_of_nodes(&big(1)), 1);
        assert_eq!(number_of_nodes(&big(0b11)), 1);
        assert_eq!(number_of_nodes(&big(0xff)), 2);
        assert_eq!(number_of_nodes(&big(0x100)), 3);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        // 1-node pattern with green self-loop only
        assert_eq!(
            decode(1, &big(0b01)),
            Err(LiftingError::MissingPredecessor { n: 1, node: 0, color: Color::Red })
        );
        assert_eq!(
            decode(1, &big(0b111)),
            Err(LiftingError::CodeTooLong { n: 1, bits: 3 })
        );
        assert_eq!(decode_inferred(&big(0)), Err(LiftingError::EmptyCode));
        assert!(decode(1, &big(0b11)).unwrap().has_double_selfloop());
    }

    #[test]
    fn test_decode_rejects_short_code_before_building() {
        assert_eq!(
            decode(20_000, &big(1)),
            Err(LiftingError::MissingPredecessor { n: 20_000, node: 19_999, color: Color::Red })
        );
        assert_eq!(
            decode(usize::MAX, &big(1)),
            Err(LiftingError::MissingPredecessor {
                n: usize::MAX,
                node: usize::MAX - 1,
                color: Color::Red
            })
        );
        // the lowest bit that can hold a red edge into node 1
        assert!(decode(2, &big(0b1011 | 1 << 4 | 1 << 6)).is_ok());
        assert_eq!(
            decode(2, &big(0b1011 | 1 << 4 | 1 << 5)),
            Err(LiftingError::MissingPredecessor { n: 2, node: 1, color: Color::Red })
        );
    }

    #[test]
    fn test_old_code_to_new() {
        assert_eq!(old_code_to_new(2, &big(0b11010010)), big(0b10110100));
        assert_eq!(
            old_code_to_new(3, &big(0b010011111011010010)),
            big(0b001111011000111100)
        );
    }

    #[test]
    fn test_normal_form() {
        let (n, code) = encode(&vierer());
        assert!(!is_normal_form(n, &code));
        let (n, code) = encode(&vierer().to_normal_form());
        assert!(is_normal_form(n, &code));

        // more red than green edges
        let p = Pattern::from_edge_lists(1, &[(0, 0)], &[(0, 0)]);
        assert!(is_normal_form(1, &encode(&p).1));
        let p = Pattern::from_edge_lists(2, &[(0, 1), (1, 0)], &[(0, 0), (0, 1), (1, 0)]);
        assert!(!is_normal_form(2, &encode(&p).1));
    }

    #[test]
    fn test_record_parse_and_print() {
        let record: CodeRecord = "4,1176775189\n".parse().unwrap();
        assert_eq!(record, CodeRecord::new(4, big(1176775189)));
        assert_eq!(record.to_string(), "4,1176775189");
        assert_eq!(record.decode().unwrap(), vierer());
        assert_eq!(CodeRecord::from_pattern(&vierer()), record);
        assert!(matches!(
            "4;12".parse::<CodeRecord>(),
            Err(LiftingError::MalformedRecord(_))
        ));
        assert!("x,12".parse::<CodeRecord>().is_err());
    }
}
