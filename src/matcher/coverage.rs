//! Per-character coverage tracking for the match finder.

use std::ops::Range;

use bit_vec::BitVec;

/// Which character positions of a text have been claimed by a match.
#[derive(Debug, Clone)]
pub struct Coverage {
    bits: BitVec,
}

impl Coverage {
    /// All positions start uncovered.
    pub fn new(len: usize) -> Self {
        Coverage {
            bits: BitVec::from_elem(len, false),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_covered(&self, index: usize) -> bool {
        self.bits.get(index).unwrap_or(false)
    }

    /// True if no position in `range` is covered yet.
    pub fn is_free(&self, range: Range<usize>) -> bool {
        range.end <= self.len() && (range.start..range.end).all(|i| !self.bits[i])
    }

    /// Mark every position in `range` as covered.
    pub fn cover(&mut self, range: Range<usize>) {
        for i in range {
            self.bits.set(i, true);
        }
    }

    pub fn covered_count(&self) -> usize {
        self.bits.iter().filter(|covered| *covered).count()
    }

    /// Positions no match has claimed, ascending.
    pub fn uncovered(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, covered)| (!covered).then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_and_query() {
        let mut coverage = Coverage::new(6);
        assert!(coverage.is_free(0..6));

        coverage.cover(2..4);
        assert!(coverage.is_covered(2));
        assert!(coverage.is_covered(3));
        assert!(!coverage.is_covered(4));
        assert!(!coverage.is_free(1..3));
        assert!(coverage.is_free(4..6));
        assert_eq!(coverage.covered_count(), 2);
        assert_eq!(coverage.uncovered().collect::<Vec<_>>(), vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_out_of_bounds() {
        let coverage = Coverage::new(3);
        assert!(!coverage.is_free(2..4));
        assert!(!coverage.is_covered(10));
    }
}
