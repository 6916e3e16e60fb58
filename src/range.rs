use {
    crate::RingPosition,
    num_traits::Bounded,
    std::{
        fmt::Debug,
        ops::{RangeFrom, RangeTo},
    },
};

/// A (half-open) range of ring positions, `[start..end)`.
///
/// If `start >= end`, the range crosses the origin and covers both
/// `[start..MAX_VALUE]` and `[0..end)`. The degenerate `start == end` covers
/// the whole ring, which is what a single-token ring owns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyRange<Idx>
where
    Idx: Bounded,
{
    pub start: Idx,
    pub end: Idx,
}

impl<Idx: Bounded> KeyRange<Idx> {
    /// Creates a new range.
    pub fn new(start: Idx, end: Idx) -> Self {
        Self { start, end }
    }
}

impl<Idx> KeyRange<Idx>
where
    Idx: PartialOrd<Idx> + Clone + Debug + Bounded + Ord,
{
    /// Returns `true` if the range crosses the origin.
    ///
    /// A range ending exactly at the origin, `[start..0)`, is inverted but
    /// does not wrap.
    pub fn is_wrapping(&self) -> bool {
        self.is_inverted() && self.end != Idx::min_value()
    }

    /// Returns `true` if `start >= end`.
    pub fn is_inverted(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if the range covers the whole ring.
    pub fn covers_whole_ring(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `item` is contained in the range.
    pub fn contains(&self, item: &Idx) -> bool {
        let from: RangeFrom<&Idx> = &self.start..;
        let to: RangeTo<&Idx> = ..&self.end;
        if self.is_inverted() {
            from.contains(&item) || to.contains(&item)
        } else {
            from.contains(&item) && to.contains(&item)
        }
    }
}

impl KeyRange<RingPosition> {
    /// Number of positions in the range.
    ///
    /// The ring holds `2^64` positions, one more than fits into a
    /// `RingPosition`, so ranges crossing the origin are undercounted by one.
    pub fn size(&self) -> RingPosition {
        if self.is_inverted() {
            RingPosition::MAX - (self.start - self.end)
        } else {
            self.end - self.start
        }
    }
}
