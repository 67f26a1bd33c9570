//! An in-memory, hierarchical name-space engine addressed by absolute,
//! slash-delimited paths.
//!
//! Two variants share one core arena, one node representation, and one
//! traversal algorithm:
//! - [`tree::Dt`] — every node is a directory.
//! - [`tree::Ft`] — nodes are directories, or files carrying an opaque byte
//!   payload.
//!
//! [`tree::NameSpaceTree`] is the public entry point. See [`singleton`] for
//! an opt-in process-wide instance for callers that can't thread an owned
//! tree through their own state.

pub mod arena;
pub mod checker;
pub mod error;
#[cfg(any(test, feature = "fault-injection"))]
pub mod fault;
pub mod node;
pub mod path;
pub mod singleton;
pub mod tree;

pub use error::{NamespaceTreeError, Result};
pub use path::Path;
pub use tree::{Dt, Ft, NameSpaceTree, TreeConfig};
