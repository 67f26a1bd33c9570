//! Shared error taxonomy for every public tree operation.

/// A single error enum shared across `NameSpaceTree`'s entire public API.
///
/// Every mutating or querying operation that can fail returns this type.
/// No error is ever recovered internally; callers see every failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum NamespaceTreeError {
    /// Operation requires the opposite init state (e.g. `insert_dir` before `init`,
    /// or `init` twice in a row).
    #[error("tree is not initialized")]
    InitializationError,

    /// The path string is malformed: empty, contains an empty segment, or a NUL byte.
    #[error("malformed path: {0:?}")]
    BadPath(String),

    /// The root exists but is not a prefix of the target path.
    #[error("root exists and is not a prefix of the target path")]
    ConflictingPath,

    /// No node exists at the given path.
    #[error("no node at path: {0}")]
    NoSuchPath(String),

    /// The target, or a proper prefix of it, resolved to a file where a directory
    /// was required.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The target resolved to a directory where a file was required.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// A node with this exact path already exists.
    #[error("already in tree: {0}")]
    AlreadyInTree(String),

    /// Allocation failed partway through a multi-node insert. The partially
    /// constructed chain has already been rolled back by the time this is
    /// returned; the tree is unchanged.
    #[error("allocation failed")]
    MemoryError,
}

pub type Result<T> = std::result::Result<T, NamespaceTreeError>;
