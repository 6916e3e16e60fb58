use {
    crate::{iter::RingIter, KeyRange, RingDirection, RingNode, RingPosition, RingToken},
    std::cmp::Ordering,
    tracing::warn,
};

/// Immutable, sorted array of ring tokens.
///
/// Tokens are kept in ascending `(position, node, vnode)` order. A snapshot
/// is never modified once published: mutations produce a new snapshot, so
/// lookups against one snapshot always see a complete ring.
#[derive(Debug)]
pub(crate) struct Snapshot<N> {
    tokens: Vec<RingToken<N>>,
}

impl<N: RingNode> Snapshot<N> {
    pub(crate) fn empty() -> Self {
        Self { tokens: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn tokens(&self) -> &[RingToken<N>] {
        &self.tokens
    }

    /// Returns `true` if the exact token is part of the snapshot.
    pub(crate) fn contains(&self, token: &RingToken<N>) -> bool {
        self.tokens.binary_search(token).is_ok()
    }

    /// Distinct nodes, one per node's first virtual node, in ring order.
    pub(crate) fn nodes(&self) -> impl Iterator<Item = &N> {
        self.tokens
            .iter()
            .filter(|token| token.vnode() == 0)
            .map(RingToken::node)
    }

    /// Index of the first token at or after `pos`, wrapping to the smallest
    /// one when `pos` is past the last token.
    fn successor_index(&self, pos: RingPosition) -> Option<usize> {
        if self.tokens.is_empty() {
            return None;
        }
        let idx = self.tokens.partition_point(|token| token.position() < pos);
        Some(if idx == self.tokens.len() { 0 } else { idx })
    }

    /// Returns the token owning `pos`.
    pub(crate) fn successor(&self, pos: RingPosition) -> Option<&RingToken<N>> {
        self.successor_index(pos).map(|idx| &self.tokens[idx])
    }

    /// Returns tokens starting from the given location on the ring.
    ///
    /// Clockwise traversal starts at the token owning `start`;
    /// counter-clockwise traversal starts at the last token at or before
    /// `start`. Either way every token is visited exactly once.
    pub(crate) fn iter_from(&self, start: RingPosition, dir: RingDirection) -> RingIter<'_, N> {
        let idx = match dir {
            RingDirection::Clockwise => self.successor_index(start).unwrap_or(0),
            RingDirection::CounterClockwise => {
                match self.tokens.partition_point(|token| token.position() <= start) {
                    0 => self.tokens.len().saturating_sub(1),
                    idx => idx - 1,
                }
            }
        };
        RingIter::new(&self.tokens, idx, dir)
    }

    /// Returns the key range owned by the token at `idx`.
    ///
    /// A token owns every position after its predecessor, up to and
    /// including its own. `None` is returned for a token sharing its
    /// position with an earlier one, as lookups never reach it.
    pub(crate) fn owned_range(&self, idx: usize) -> Option<KeyRange<RingPosition>> {
        let token = self.tokens.get(idx)?;
        let prev = if idx == 0 {
            self.tokens.last()?
        } else {
            let prev = &self.tokens[idx - 1];
            if prev.position() == token.position() {
                return None;
            }
            prev
        };
        Some(KeyRange::new(
            prev.position().wrapping_add(1),
            token.position().wrapping_add(1),
        ))
    }

    /// Returns a new snapshot with `added` tokens merged in.
    ///
    /// `added` must not contain tokens already present.
    pub(crate) fn with_added(&self, mut added: Vec<RingToken<N>>) -> Self {
        added.sort_unstable();

        let mut tokens = Vec::with_capacity(self.tokens.len() + added.len());
        let mut old = self.tokens.iter().peekable();
        let mut new = added.into_iter().peekable();
        // Collisions between two existing tokens were reported when the later
        // one was added.
        let mut last_is_new = false;
        loop {
            let (next, is_new) = match (old.peek(), new.peek()) {
                (Some(a), Some(b)) => match (*a).cmp(b) {
                    Ordering::Greater => (new.next(), true),
                    _ => (old.next().cloned(), false),
                },
                (Some(_), None) => (old.next().cloned(), false),
                (None, Some(_)) => (new.next(), true),
                (None, None) => break,
            };
            let Some(next) = next else { break };
            if let Some(last) = tokens.last() {
                if is_new || last_is_new {
                    warn_on_collision(last, &next);
                }
            }
            last_is_new = is_new;
            tokens.push(next);
        }

        Self { tokens }
    }

    /// Returns a new snapshot without the `removed` tokens.
    ///
    /// `removed` must be sorted.
    pub(crate) fn without(&self, removed: &[RingToken<N>]) -> Self {
        let tokens = self
            .tokens
            .iter()
            .filter(|token| removed.binary_search(token).is_err())
            .cloned()
            .collect();
        Self { tokens }
    }
}

fn warn_on_collision<N: RingNode>(prev: &RingToken<N>, next: &RingToken<N>) {
    if prev.position() == next.position() {
        warn!(
            position = next.position(),
            winner = ?prev.node(),
            shadowed = ?next.node(),
            "ring position collision, ordering by node"
        );
    }
}
