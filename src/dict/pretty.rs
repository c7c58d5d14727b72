use std::fmt;
use std::marker::PhantomData;

use super::{Link, Node};

/// Dumps the tree shape, one node per line in pre-order.
///
/// Each level is indented by a `|__` marker, a missing child of an inner node
/// is shown as `#` and every non-root node names its parent key after a `^`.
///
/// ```
/// use avl_dictionary::AvlDictionary;
/// let dict: AvlDictionary<_, _> = [(2, "b"), (1, "a"), (3, "c")].into_iter().collect();
/// assert_eq!(dict.pretty().to_string(), "2 b\n|__1 a ^2\n|__3 c ^2\n");
/// ```
pub struct Pretty<'a, K, V> {
    root: Link<K, V>,
    marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Pretty<'a, K, V> {
    pub(super) fn new(root: Link<K, V>) -> Self {
        Self {
            root,
            marker: PhantomData,
        }
    }
}

impl<'a, K: fmt::Display, V: fmt::Display> fmt::Display for Pretty<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            None => Ok(()),
            root => write_subtree(f, 0, root),
        }
    }
}

fn write_subtree<K: fmt::Display, V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    level: usize,
    link: Link<K, V>,
) -> fmt::Result {
    if level > 0 {
        write!(f, "{}|__", "   ".repeat(level - 1))?;
    }
    let node = match link {
        None => return writeln!(f, "#"),
        Some(node_ptr) => unsafe { node_ptr.as_ref() },
    };
    write!(f, "{} {}", node.key, node.value)?;
    if let Some(parent_ptr) = node.parent {
        write!(f, " ^{}", unsafe { &parent_ptr.as_ref().key })?;
    }
    writeln!(f)?;
    if node.left.is_some() || node.right.is_some() {
        write_subtree(f, level + 1, node.left)?;
        write_subtree(f, level + 1, node.right)?;
    }
    Ok(())
}
