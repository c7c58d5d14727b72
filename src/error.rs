use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rejected key arguments.
///
/// Both conditions are detected while descending the tree, before any node is
/// touched, so a failed call leaves the dictionary unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The key does not compare equal to itself, e.g. `f64::NAN` under
    /// [`PartialOrder`](crate::PartialOrder).
    #[error("key is not ordered with respect to itself")]
    UnorderedKey,

    /// The key cannot be ordered against a key already stored in the tree.
    #[error("key cannot be ordered against a stored key")]
    IncomparableKeys,
}
