use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{Link, Node, NodePtr};

/// In-order cursor over the nodes of a tree.
///
/// Walks the tree by following parent links, so it needs no storage besides
/// the current position.
struct Cursor<K, V> {
    root: Link<K, V>,
    position: Position<K, V>,
    remaining: usize,
}

enum Position<K, V> {
    BeforeFirst,
    At(NodePtr<K, V>),
    Done,
}

impl<K, V> Cursor<K, V> {
    fn new(root: Link<K, V>, len: usize) -> Self {
        Self {
            root,
            position: Position::BeforeFirst,
            remaining: len,
        }
    }

    fn advance(&mut self) -> Link<K, V> {
        let next = match self.position {
            Position::BeforeFirst => self.root.map(leftmost_descendant),
            Position::At(node_ptr) => successor(node_ptr),
            Position::Done => None,
        };
        self.position = match next {
            Some(node_ptr) => {
                self.remaining -= 1;
                Position::At(node_ptr)
            }
            None => {
                debug_assert_eq!(self.remaining, 0);
                Position::Done
            }
        };
        next
    }
}

fn leftmost_descendant<K, V>(mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
    while let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
        node_ptr = left_ptr;
    }
    node_ptr
}

fn successor<K, V>(node_ptr: NodePtr<K, V>) -> Link<K, V> {
    if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
        return Some(leftmost_descendant(right_ptr));
    }

    // Ascend as long as we come from a right subtree
    let mut child_ptr = node_ptr;
    while let Some(parent_ptr) = unsafe { child_ptr.as_ref().parent } {
        if unsafe { parent_ptr.as_ref().left } == Some(child_ptr) {
            return Some(parent_ptr);
        }
        child_ptr = parent_ptr;
    }
    None
}

/// An iterator over the entries of a dictionary, sorted by key.
///
/// The iterator borrows the dictionary, so the tree cannot be modified while it is alive.
pub struct Iter<'a, K, V> {
    cursor: Cursor<K, V>,
    marker: PhantomData<&'a Node<K, V>>,
}

/// A mutable iterator over the entries of a dictionary, sorted by key.
pub struct IterMut<'a, K, V> {
    cursor: Cursor<K, V>,
    marker: PhantomData<&'a mut Node<K, V>>,
}

/// An iterator over the keys of a dictionary, in sorted order.
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// An iterator over the values of a dictionary, in order by key.
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(root: Link<K, V>, len: usize) -> Self {
        Self {
            cursor: Cursor::new(root, len),
            marker: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance().map(|node_ptr| {
            let node = unsafe { &*node_ptr.as_ptr() };
            (&node.key, &node.value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(super) fn new(root: Link<K, V>, len: usize) -> Self {
        Self {
            cursor: Cursor::new(root, len),
            marker: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance().map(|node_ptr| {
            let node = unsafe { &mut *node_ptr.as_ptr() };
            (&node.key, &mut node.value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

impl<'a, K, V> Keys<'a, K, V> {
    pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

impl<'a, K, V> Values<'a, K, V> {
    pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

impl<'a, K, V> FusedIterator for Values<'a, K, V> {}
