use tracing::trace;

use super::{AvlDictionary, Link, NodePtr};

/// Height of a subtree, -1 for an empty one.
fn height<K, V>(link: Link<K, V>) -> i32 {
    match link {
        None => -1,
        Some(node_ptr) => unsafe { node_ptr.as_ref().height },
    }
}

fn balance_factor<K, V>(node_ptr: NodePtr<K, V>) -> i32 {
    let node = unsafe { node_ptr.as_ref() };
    height(node.right) - height(node.left)
}

fn adjust_height<K, V>(mut node_ptr: NodePtr<K, V>) {
    unsafe {
        let node = node_ptr.as_mut();
        node.height = 1 + height(node.left).max(height(node.right));
    }
}

impl<K, V, C> AvlDictionary<K, V, C> {
    /// Rebalances nodes starting from given position up to the root node.
    pub(super) fn rebalance(&mut self, start_from: Link<K, V>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            self.rebalance_node(node_ptr);
            current = parent;
        }
    }

    /// Adjusts height and restores AVL condition (balance) at given node if necessary.
    /// Resulting balance factor will be +1, 0 or -1.
    /// Initial balance factor must not exceed +2 or -2, which always holds after a single update.
    fn rebalance_node(&mut self, node_ptr: NodePtr<K, V>) {
        adjust_height(node_ptr);
        let node = unsafe { node_ptr.as_ref() };
        match balance_factor(node_ptr) {
            -1..=1 => {}
            -2 => {
                // Left heavy
                let Some(left_ptr) = node.left else {
                    unreachable!("left heavy node without left child");
                };
                if balance_factor(left_ptr) > 0 {
                    trace!(
                        target: "avl_dictionary::balance",
                        height = node.height,
                        balance = -2,
                        "double rotation left-right"
                    );
                    self.rotate_left(left_ptr);
                }
                self.rotate_right(node_ptr);
            }
            2 => {
                // Right heavy
                let Some(right_ptr) = node.right else {
                    unreachable!("right heavy node without right child");
                };
                if balance_factor(right_ptr) < 0 {
                    trace!(
                        target: "avl_dictionary::balance",
                        height = node.height,
                        balance = 2,
                        "double rotation right-left"
                    );
                    self.rotate_right(right_ptr);
                }
                self.rotate_left(node_ptr);
            }
            balance => panic!("balance factor {balance} out of range"),
        }
    }

    //   n          r
    //  / \        / \
    // a   r  ->  n   c
    //    / \    / \
    //   b   c  a   b
    fn rotate_left(&mut self, mut node_ptr: NodePtr<K, V>) {
        unsafe {
            let Some(mut right_ptr) = node_ptr.as_ref().right else {
                panic!("rotate_left on node without right child");
            };
            node_ptr.as_mut().right = right_ptr.as_ref().left;
            if let Some(mut crossing_ptr) = right_ptr.as_ref().left {
                crossing_ptr.as_mut().parent = Some(node_ptr);
            }

            let parent = node_ptr.as_ref().parent;
            right_ptr.as_mut().parent = parent;
            self.replace_child(parent, node_ptr, Some(right_ptr));

            right_ptr.as_mut().left = Some(node_ptr);
            node_ptr.as_mut().parent = Some(right_ptr);

            adjust_height(node_ptr);
            adjust_height(right_ptr);
            trace!(
                target: "avl_dictionary::balance",
                height = right_ptr.as_ref().height,
                balance = balance_factor(right_ptr),
                "rotated left"
            );
        }
    }

    //     n        l
    //    / \      / \
    //   l   c -> a   n
    //  / \          / \
    // a   b        b   c
    fn rotate_right(&mut self, mut node_ptr: NodePtr<K, V>) {
        unsafe {
            let Some(mut left_ptr) = node_ptr.as_ref().left else {
                panic!("rotate_right on node without left child");
            };
            node_ptr.as_mut().left = left_ptr.as_ref().right;
            if let Some(mut crossing_ptr) = left_ptr.as_ref().right {
                crossing_ptr.as_mut().parent = Some(node_ptr);
            }

            let parent = node_ptr.as_ref().parent;
            left_ptr.as_mut().parent = parent;
            self.replace_child(parent, node_ptr, Some(left_ptr));

            left_ptr.as_mut().right = Some(node_ptr);
            node_ptr.as_mut().parent = Some(left_ptr);

            adjust_height(node_ptr);
            adjust_height(left_ptr);
            trace!(
                target: "avl_dictionary::balance",
                height = left_ptr.as_ref().height,
                balance = balance_factor(left_ptr),
                "rotated right"
            );
        }
    }
}
