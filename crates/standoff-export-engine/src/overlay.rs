use crate::flatten::CharRange;

/// Read-only membership queries over a set of character ranges.
///
/// The segmenter only ever asks these two questions, so faster structures
/// can replace the linear scan without touching it.
pub trait RangeOverlay {
    /// Ids of the ranges covering `pos`, in input order.
    fn ranges_at(&self, pos: usize) -> Vec<&str>;

    /// True when `a` and `b` are covered by exactly the same ranges.
    fn same_membership(&self, a: usize, b: usize) -> bool;
}

/// Linear-scan overlay over a list of ranges.
#[derive(Debug, Clone, Default)]
pub struct MergedRangeSet {
    ranges: Vec<CharRange>,
}

impl MergedRangeSet {
    pub fn new(ranges: Vec<CharRange>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl From<Vec<CharRange>> for MergedRangeSet {
    fn from(ranges: Vec<CharRange>) -> Self {
        Self::new(ranges)
    }
}

impl RangeOverlay for MergedRangeSet {
    fn ranges_at(&self, pos: usize) -> Vec<&str> {
        self.ranges
            .iter()
            .filter(|r| r.covers(pos))
            .map(|r| r.id.as_str())
            .collect()
    }

    fn same_membership(&self, a: usize, b: usize) -> bool {
        // Membership is compared per range, so duplicated ids still count.
        self.ranges.iter().all(|r| r.covers(a) == r.covers(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> MergedRangeSet {
        vec![
            CharRange::new(2, 2, 0, 0),
            CharRange::new(2, 4, 1, 0),
            CharRange::new(4, 14, 2, 0),
        ]
        .into()
    }

    #[test]
    fn ranges_at_keeps_input_order() {
        let s = set();
        assert_eq!(s.ranges_at(0), Vec::<&str>::new());
        assert_eq!(s.ranges_at(2), vec!["L0F0", "L1F0"]);
        assert_eq!(s.ranges_at(4), vec!["L1F0", "L2F0"]);
        assert_eq!(s.ranges_at(14), vec!["L2F0"]);
        assert_eq!(s.ranges_at(15), Vec::<&str>::new());
    }

    #[test]
    fn same_membership_compares_active_sets() {
        let s = set();
        assert!(s.same_membership(0, 1));
        assert!(!s.same_membership(1, 2));
        assert!(!s.same_membership(2, 3));
        assert!(s.same_membership(5, 14));
        assert!(s.same_membership(15, 100));
    }

    #[test]
    fn empty_set_has_uniform_membership() {
        let s = MergedRangeSet::default();
        assert!(s.is_empty());
        assert!(s.same_membership(0, 10));
        assert!(s.ranges_at(3).is_empty());
    }
}
