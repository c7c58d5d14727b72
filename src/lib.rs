//! An ordered key-value dictionary implemented with an AVL tree.
//!
//! [`AvlDictionary`] keeps its entries sorted by key. After every insertion
//! and removal the tree is rebalanced, so no two sibling subtrees differ in
//! height by more than one and all operations run in *O(log n)*.
//!
//! Keys are ordered by their [`Ord`] implementation by default. Any other
//! [`Compare`] implementation, including a plain closure, can be chosen at
//! construction and stays fixed for the lifetime of the dictionary.
//!
//! ```
//! use avl_dictionary::AvlDictionary;
//!
//! let mut dict = AvlDictionary::new();
//! for (key, value) in [(5, "e"), (3, "c"), (8, "h"), (1, "a"), (4, "d")] {
//!     dict.insert(key, value);
//! }
//! assert_eq!(dict.len(), 5);
//! assert_eq!(dict.search(&3), Some(&"c"));
//!
//! let entries: Vec<_> = dict.iter().map(|(k, v)| (*k, *v)).collect();
//! assert_eq!(entries, [(1, "a"), (3, "c"), (4, "d"), (5, "e"), (8, "h")]);
//! ```
//!
//! Keys that a comparator cannot order are rejected before the tree is touched:
//!
//! ```
//! use avl_dictionary::{AvlDictionary, Error, PartialOrder};
//!
//! let mut dict = AvlDictionary::with_comparator(PartialOrder);
//! assert_eq!(dict.try_insert(1.5, "x"), Ok(None));
//! assert_eq!(dict.try_insert(f64::NAN, "y"), Err(Error::UnorderedKey));
//! assert_eq!(dict.len(), 1);
//! ```

mod compare;
mod dict;
mod error;

pub use compare::{Compare, NaturalOrder, PartialOrder};
pub use dict::{AvlDictionary, Iter, IterMut, Keys, Pretty, Values};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
