use crate::{token::RingToken, RingDirection};

/// Walks the tokens of a snapshot exactly once around the ring.
///
/// Starts at a given index and moves either clockwise (ascending positions)
/// or counter-clockwise, wrapping around the origin.
pub(crate) struct RingIter<'a, T> {
    tokens: &'a [RingToken<T>],
    start: usize,
    dir: RingDirection,
    front: usize,
    back: usize,
}

impl<'a, T> RingIter<'a, T> {
    pub(crate) fn new(tokens: &'a [RingToken<T>], start: usize, dir: RingDirection) -> Self {
        Self {
            tokens,
            start,
            dir,
            front: 0,
            back: tokens.len(),
        }
    }

    fn index(&self, step: usize) -> usize {
        let len = self.tokens.len();
        match self.dir {
            RingDirection::Clockwise => (self.start + step) % len,
            RingDirection::CounterClockwise => (self.start + len - step) % len,
        }
    }
}

impl<'a, T> Iterator for RingIter<'a, T> {
    type Item = &'a RingToken<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let tokens = self.tokens;
        let idx = self.index(self.front);
        self.front += 1;
        Some(&tokens[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for RingIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let tokens = self.tokens;
        self.back -= 1;
        Some(&tokens[self.index(self.back)])
    }
}

impl<T> ExactSizeIterator for RingIter<'_, T> {}
