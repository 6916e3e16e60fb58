use {
    crate::{RingNode, RingPosition},
    std::{borrow::Borrow, cmp::Ordering, ops::Deref},
};

/// An ownership over a position on the ring by the object of type `T`
/// (normally, `RingNode`).
///
/// Every physical node owns `virtual_node_count` tokens, one per virtual node.
/// Tokens handed out by the ring are copies, the ring keeps its own.
#[derive(Clone, Debug)]
pub struct RingToken<T> {
    position: RingPosition,
    node: T,
    vnode: u32,
}

impl<T: RingNode> RingToken<T> {
    pub(crate) fn new(position: RingPosition, node: T, vnode: u32) -> Self {
        Self {
            position,
            node,
            vnode,
        }
    }

    /// Return the position of the token on the ring.
    pub fn position(&self) -> RingPosition {
        self.position
    }

    /// Return the node that owns this token.
    pub fn node(&self) -> &T {
        &self.node
    }

    /// Return the index of the virtual node this token represents.
    pub fn vnode(&self) -> u32 {
        self.vnode
    }

    /// Consumes the token, returning the owning node.
    pub fn into_node(self) -> T {
        self.node
    }
}

impl<T> Deref for RingToken<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl<T> AsRef<T> for RingToken<T> {
    fn as_ref(&self) -> &T {
        &self.node
    }
}

impl<T> Borrow<T> for RingToken<T> {
    fn borrow(&self) -> &T {
        &self.node
    }
}

// Tokens are compared by `(position, node, vnode)`. Two distinct placements
// can only tie on position in case of hash collision, and the node/vnode
// parts keep the order total and deterministic then.
impl<T: RingNode> PartialEq for RingToken<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: RingNode> Eq for RingToken<T> {}

impl<T> PartialEq<T> for RingToken<T>
where
    T: RingNode,
{
    fn eq(&self, other: &T) -> bool {
        &self.node == other
    }
}

impl<T> PartialEq<&T> for RingToken<T>
where
    T: RingNode,
{
    fn eq(&self, other: &&T) -> bool {
        &self.node == *other
    }
}

impl<T: RingNode> PartialOrd for RingToken<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: RingNode> Ord for RingToken<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position
            .cmp(&other.position)
            .then_with(|| self.node.cmp(&other.node))
            .then_with(|| self.vnode.cmp(&other.vnode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_breaks_ties_by_node_then_vnode() {
        let a = RingToken::new(7, "a", 3);
        let b = RingToken::new(7, "b", 0);
        let c = RingToken::new(7, "b", 1);
        let d = RingToken::new(6, "z", 9);

        let mut tokens = vec![c.clone(), a.clone(), d.clone(), b.clone()];
        tokens.sort();
        assert_eq!(tokens, vec![d, a, b, c]);
    }

    #[test]
    fn compares_with_node() {
        let token = RingToken::new(1, "n1", 0);
        assert!(token == "n1");
        assert!(token == &"n1");
        assert_eq!(*token, "n1");
        assert_eq!(token.into_node(), "n1");
    }
}
