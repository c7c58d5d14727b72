use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use tracing::trace;

use crate::compare::{Compare, NaturalOrder};
use crate::error::{Error, Result};

mod balance;
mod iter;
mod pretty;

pub use iter::{Iter, IterMut, Keys, Values};
pub use pretty::Pretty;

/// An ordered key-value dictionary implemented with an AVL tree.
///
/// Keys are ordered by the comparator `C`, chosen once at construction.
///
/// ```
/// use avl_dictionary::AvlDictionary;
/// let mut dict = AvlDictionary::new();
/// dict.insert(5, "e");
/// dict.insert(3, "c");
/// dict.insert(8, "h");
/// assert_eq!(dict.search(&3), Some(&"c"));
/// assert_eq!(dict.remove(&5), Some("e"));
/// assert!(dict.search(&5).is_none());
/// assert_eq!(dict.len(), 2);
/// ```
pub struct AvlDictionary<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    num_nodes: usize,
    comparator: C,
    marker: PhantomData<Box<Node<K, V>>>,
}

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    parent: Link<K, V>,
    height: i32,
}

type NodePtr<K, V> = NonNull<Node<K, V>>;
type Link<K, V> = Option<NodePtr<K, V>>;
type LinkPtr<K, V> = NonNull<Link<K, V>>;

enum InsertPos<K, V> {
    Occupied(NodePtr<K, V>),
    Vacant(Link<K, V>, LinkPtr<K, V>),
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K: Ord, V> AvlDictionary<K, V> {
    /// Creates an empty dictionary ordered by the keys' natural order.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C> AvlDictionary<K, V, C> {
    /// Creates an empty dictionary ordered by `comparator`.
    ///
    /// ```
    /// use avl_dictionary::AvlDictionary;
    /// let mut dict = AvlDictionary::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// dict.insert(1, ());
    /// dict.insert(2, ());
    /// assert_eq!(dict.keys().copied().collect::<Vec<_>>(), [2, 1]);
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            num_nodes: 0,
            comparator,
            marker: PhantomData,
        }
    }

    /// Returns the ordering the dictionary was constructed with.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns true if the dictionary contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the dictionary.
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, `None` if it is empty.
    /// A single node has height 0.
    pub fn height(&self) -> Option<usize> {
        self.root
            .map(|root_ptr| unsafe { root_ptr.as_ref().height as usize })
    }

    /// Clears the dictionary, deallocating all memory.
    pub fn clear(&mut self) {
        self.postorder(|node_ptr| unsafe { Node::destroy(node_ptr) });
        self.root = None;
        self.num_nodes = 0;
    }

    /// Gets an iterator over the entries of the dictionary, sorted by key.
    #[doc(alias = "iterate")]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root, self.num_nodes)
    }

    /// Gets a mutable iterator over the entries of the dictionary, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.root, self.num_nodes)
    }

    /// Gets an iterator over the keys of the dictionary, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the dictionary, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns a [`Display`](fmt::Display) adapter dumping the tree shape.
    pub fn pretty(&self) -> Pretty<'_, K, V> {
        Pretty::new(self.root)
    }

    /// Replaces the link from `parent` to `old` by `new`.
    /// Without parent, `old` is the root node.
    fn replace_child(&mut self, parent: Link<K, V>, old: NodePtr<K, V>, new: Link<K, V>) {
        match parent {
            None => self.root = new,
            Some(mut parent_ptr) => unsafe {
                if parent_ptr.as_ref().left == Some(old) {
                    parent_ptr.as_mut().left = new;
                } else {
                    debug_assert!(parent_ptr.as_ref().right == Some(old));
                    parent_ptr.as_mut().right = new;
                }
            },
        }
    }

    /// Unlinks the node holding the entry to be removed and returns the unlinked node.
    ///
    /// A node with two children stays in place: it takes over key and value of
    /// its in-order successor, whose node is unlinked instead.
    unsafe fn unlink_node(&mut self, mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        match (node_ptr.as_ref().left, node_ptr.as_ref().right) {
            (Some(_), Some(right_ptr)) => {
                let mut min_ptr = right_ptr;
                while let Some(left_ptr) = min_ptr.as_ref().left {
                    min_ptr = left_ptr;
                }
                mem::swap(&mut node_ptr.as_mut().key, &mut min_ptr.as_mut().key);
                mem::swap(&mut node_ptr.as_mut().value, &mut min_ptr.as_mut().value);
                self.splice_out(min_ptr);
                min_ptr
            }
            _ => {
                self.splice_out(node_ptr);
                node_ptr
            }
        }
    }

    /// Splices out a node with at most one child, promoting that child.
    unsafe fn splice_out(&mut self, node_ptr: NodePtr<K, V>) {
        let node = node_ptr.as_ref();
        assert!(
            node.left.is_none() || node.right.is_none(),
            "splice_out on node with two children"
        );
        let parent = node.parent;
        let child = node.left.or(node.right);
        if let Some(mut child_ptr) = child {
            child_ptr.as_mut().parent = parent;
        }
        self.replace_child(parent, node_ptr, child);

        // Parent node might be out of balance now
        self.rebalance(parent);
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn preorder<F: FnMut(NodePtr<K, V>)>(&self, f: F) {
        self.traverse(f, |_| {});
    }

    fn postorder<F: FnMut(NodePtr<K, V>)>(&self, f: F) {
        self.traverse(|_| {}, f);
    }

    fn traverse<Pre, Post>(&self, mut preorder: Pre, mut postorder: Post)
    where
        Pre: FnMut(NodePtr<K, V>),
        Post: FnMut(NodePtr<K, V>),
    {
        if let Some(mut node_ptr) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_ptr);
                        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                            node_ptr = left_ptr;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                            node_ptr = right_ptr;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        // Post order traversal is used for node deletion,
                        // so make sure not to use node pointer after postorder call.
                        if let Some(parent_ptr) = unsafe { node_ptr.as_ref().parent } {
                            if Some(node_ptr) == unsafe { parent_ptr.as_ref().left } {
                                dir = Direction::FromLeft;
                            } else {
                                dir = Direction::FromRight;
                            }
                            postorder(node_ptr);
                            node_ptr = parent_ptr;
                        } else {
                            postorder(node_ptr);
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl<K, V, C: Compare<K>> AvlDictionary<K, V, C> {
    /// Inserts a key-value pair into the dictionary.
    /// Returns the previous value if the key was already present; the stored
    /// key is kept in that case.
    ///
    /// # Panics
    ///
    /// Panics if the comparator cannot order `key`, see [`try_insert`](Self::try_insert).
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(old_value) => old_value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts a key-value pair into the dictionary.
    /// Returns the previous value if the key was already present.
    ///
    /// Fails without modifying the dictionary if the comparator cannot order `key`.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.check_key(&key)?;
        match self.find_insert_pos(&key)? {
            InsertPos::Occupied(mut node_ptr) => {
                let old_value = mem::replace(unsafe { &mut node_ptr.as_mut().value }, value);
                Ok(Some(old_value))
            }
            InsertPos::Vacant(parent, mut link_ptr) => {
                unsafe {
                    *link_ptr.as_mut() = Some(Node::create(parent, key, value));
                }
                self.num_nodes += 1;
                trace!(
                    target: "avl_dictionary::dict",
                    len = self.num_nodes,
                    "created node"
                );
                self.rebalance(parent);
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Panics
    ///
    /// Panics if the comparator cannot order `key`, see [`try_search`](Self::try_search).
    pub fn search(&self, key: &K) -> Option<&V> {
        match self.try_search(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn try_search(&self, key: &K) -> Result<Option<&V>> {
        Ok(self
            .find(key)?
            .map(|node_ptr| &unsafe { &*node_ptr.as_ptr() }.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Panics
    ///
    /// Panics if the comparator cannot order `key`.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            Ok(link) => link.map(|node_ptr| &mut unsafe { &mut *node_ptr.as_ptr() }.value),
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns references to the key-value pair corresponding to the key.
    ///
    /// # Panics
    ///
    /// Panics if the comparator cannot order `key`.
    pub fn search_key_value(&self, key: &K) -> Option<(&K, &V)> {
        match self.find(key) {
            Ok(link) => link.map(|node_ptr| {
                let node = unsafe { &*node_ptr.as_ptr() };
                (&node.key, &node.value)
            }),
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns true if the dictionary contains a value for the key.
    ///
    /// # Panics
    ///
    /// Panics if the comparator cannot order `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Removes a key from the dictionary.
    /// Returns the value at the key if the key was previously in the dictionary.
    ///
    /// # Panics
    ///
    /// Panics if the comparator cannot order `key`, see [`try_remove`](Self::try_remove).
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.try_remove(key) {
            Ok(old_value) => old_value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes a key from the dictionary.
    /// Returns the value at the key if the key was previously in the dictionary.
    ///
    /// Fails without modifying the dictionary if the comparator cannot order `key`.
    pub fn try_remove(&mut self, key: &K) -> Result<Option<V>> {
        let node_ptr = match self.find(key)? {
            Some(node_ptr) => node_ptr,
            None => return Ok(None),
        };
        debug_assert!(self.num_nodes >= 1);
        let unlinked_ptr = unsafe { self.unlink_node(node_ptr) };
        let node = unsafe { Box::from_raw(unlinked_ptr.as_ptr()) };
        self.num_nodes -= 1;
        trace!(
            target: "avl_dictionary::dict",
            len = self.num_nodes,
            "removed node"
        );
        Ok(Some(node.value))
    }

    /// Asserts all tree invariants: key order, AVL balance, cached heights,
    /// parent links and the element count.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        unsafe {
            // Check root link
            if let Some(root_ptr) = self.root {
                assert!(root_ptr.as_ref().parent.is_none());
            }

            // Check tree nodes
            let mut num_nodes = 0;
            self.preorder(|node_ptr| {
                let node = node_ptr.as_ref();
                let mut left_height: i32 = -1;
                let mut right_height: i32 = -1;

                // Check link for left child node
                if let Some(left_ptr) = node.left {
                    assert!(left_ptr.as_ref().parent == Some(node_ptr));
                    assert_eq!(
                        self.comparator.compare(&left_ptr.as_ref().key, &node.key),
                        Some(Ordering::Less)
                    );
                    left_height = left_ptr.as_ref().height;
                }

                // Check link for right child node
                if let Some(right_ptr) = node.right {
                    assert!(right_ptr.as_ref().parent == Some(node_ptr));
                    assert_eq!(
                        self.comparator.compare(&right_ptr.as_ref().key, &node.key),
                        Some(Ordering::Greater)
                    );
                    right_height = right_ptr.as_ref().height;
                }

                // Check height
                assert_eq!(node.height, 1 + left_height.max(right_height));

                // Check AVL condition (nearly balance)
                assert!((right_height - left_height).abs() <= 1);

                num_nodes += 1;
            });

            // Check number of nodes
            assert_eq!(num_nodes, self.num_nodes);

            // Keys strictly ascending, which covers ordering across subtrees
            let mut keys = self.keys();
            if let Some(mut prev) = keys.next() {
                for key in keys {
                    assert_eq!(self.comparator.compare(prev, key), Some(Ordering::Less));
                    prev = key;
                }
            }
        }
    }

    fn check_key(&self, key: &K) -> Result<()> {
        match self.comparator.compare(key, key) {
            Some(Ordering::Equal) => Ok(()),
            _ => Err(Error::UnorderedKey),
        }
    }

    fn order(&self, key: &K, node_ptr: NodePtr<K, V>) -> Result<Ordering> {
        self.comparator
            .compare(key, unsafe { &node_ptr.as_ref().key })
            .ok_or(Error::IncomparableKeys)
    }

    fn find(&self, key: &K) -> Result<Link<K, V>> {
        self.check_key(key)?;
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = match self.order(key, node_ptr)? {
                Ordering::Equal => break,
                Ordering::Less => unsafe { node_ptr.as_ref().left },
                Ordering::Greater => unsafe { node_ptr.as_ref().right },
            }
        }
        Ok(current)
    }

    fn find_insert_pos(&mut self, key: &K) -> Result<InsertPos<K, V>> {
        let mut parent: Link<K, V> = None;
        let mut link_ptr: LinkPtr<K, V> = unsafe { LinkPtr::new_unchecked(&mut self.root) };
        unsafe {
            while let Some(mut node_ptr) = *link_ptr.as_ref() {
                parent = Some(node_ptr);
                link_ptr = match self.order(key, node_ptr)? {
                    Ordering::Equal => return Ok(InsertPos::Occupied(node_ptr)),
                    Ordering::Less => LinkPtr::new_unchecked(&mut node_ptr.as_mut().left),
                    Ordering::Greater => LinkPtr::new_unchecked(&mut node_ptr.as_mut().right),
                };
            }
        }
        Ok(InsertPos::Vacant(parent, link_ptr))
    }
}

impl<K, V, C> Drop for AvlDictionary<K, V, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Ord, V> Default for AvlDictionary<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for AvlDictionary<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            root: Node::clone_subtree(self.root, None),
            num_nodes: self.num_nodes,
            comparator: self.comparator.clone(),
            marker: PhantomData,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlDictionary<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for AvlDictionary<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlDictionary<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlDictionary<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlDictionary<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> Node<K, V> {
    fn create(parent: Link<K, V>, key: K, value: V) -> NodePtr<K, V> {
        let boxed = Box::new(Node {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 0,
        });
        unsafe { NodePtr::new_unchecked(Box::into_raw(boxed)) }
    }

    unsafe fn destroy(node_ptr: NodePtr<K, V>) {
        drop(Box::from_raw(node_ptr.as_ptr()));
    }

    fn clone_subtree(link: Link<K, V>, parent: Link<K, V>) -> Link<K, V>
    where
        K: Clone,
        V: Clone,
    {
        link.map(|node_ptr| {
            let node = unsafe { node_ptr.as_ref() };
            let mut clone_ptr = Node::create(parent, node.key.clone(), node.value.clone());
            let left = Node::clone_subtree(node.left, Some(clone_ptr));
            let right = Node::clone_subtree(node.right, Some(clone_ptr));
            unsafe {
                let clone = clone_ptr.as_mut();
                clone.height = node.height;
                clone.left = left;
                clone.right = right;
            }
            clone_ptr
        })
    }
}
