//! Recursive structural validator.
//!
//! Verifies the invariants of §3.2/§8.1 of the design this core implements:
//! root uniqueness, the parent-path contract, strictly increasing sibling
//! order, the files-never-parent rule, and that the reachable node count
//! matches the façade's bookkeeping. Pure and side-effect-free beyond
//! logging; never affects control flow (design note: diagnostic text is
//! informational only, routed through `log` rather than printed to
//! stderr — no test may depend on the exact wording).

use crate::arena::{Arena, NodeId};
use crate::node::{ChildKind, Node};
use crate::path::Path;

/// Checks `(initialized, root, expected_count)` against the tree's actual
/// structure. Returns `true` when every invariant holds.
pub fn is_valid(
    initialized: bool,
    arena: &Arena<Node>,
    root: Option<NodeId>,
    expected_count: usize,
) -> bool {
    if !initialized {
        if root.is_some() {
            log::error!("checker: tree reports uninitialized but root is set");
            return false;
        }
        if expected_count != 0 {
            log::error!("checker: tree reports uninitialized but expected_count is {expected_count}");
            return false;
        }
        return true;
    }

    let Some(root_id) = root else {
        if expected_count != 0 {
            log::error!("checker: root is empty but expected_count is {expected_count}");
            return false;
        }
        return true;
    };

    let Some(root_node) = arena.get(root_id) else {
        log::error!("checker: root id does not resolve to a node");
        return false;
    };
    if root_node.parent().is_some() {
        log::error!("checker: root node has a parent");
        return false;
    }
    if root_node.path().depth() != 1 {
        log::error!(
            "checker: root path {} has depth {}, expected 1",
            root_node.path(),
            root_node.path().depth()
        );
        return false;
    }

    let mut visited = 0usize;
    if !validate_subtree(arena, root_id, &mut visited) {
        return false;
    }

    if visited != expected_count {
        log::error!("checker: reachable node count is {visited}, expected {expected_count}");
        return false;
    }
    true
}

fn validate_subtree(arena: &Arena<Node>, id: NodeId, visited: &mut usize) -> bool {
    let Some(node) = arena.get(id) else {
        log::error!("checker: dangling node id in tree");
        return false;
    };
    *visited += 1;

    if let Some(parent_id) = node.parent() {
        match arena.get(parent_id) {
            Some(parent) => {
                if !node.path().is_immediate_child_of(parent.path()) {
                    log::error!(
                        "checker: parent path {} is not the immediate prefix of child path {}",
                        parent.path(),
                        node.path()
                    );
                    return false;
                }
            }
            None => {
                log::error!("checker: parent id does not resolve to a node");
                return false;
            }
        }
    }

    if node.is_file() {
        // A file can carry no children; nothing further to verify.
        return true;
    }

    for kind in [ChildKind::File, ChildKind::Dir] {
        let count = node.num_children(kind);
        let mut child_ids = Vec::with_capacity(count);
        for i in 0..count {
            match node.get_child(i, kind) {
                Ok(child_id) => child_ids.push(child_id),
                Err(_) => {
                    log::error!("checker: child index {i} out of range for {}", node.path());
                    return false;
                }
            }
        }

        let expected_is_file = kind == ChildKind::File;
        let mut prev_path: Option<Path> = None;
        for &child_id in &child_ids {
            let Some(child) = arena.get(child_id) else {
                log::error!("checker: child id does not resolve to a node");
                return false;
            };
            if child.parent() != Some(id) {
                log::error!(
                    "checker: child {}'s back-link does not point to its actual parent",
                    child.path()
                );
                return false;
            }
            if child.is_file() != expected_is_file {
                log::error!(
                    "checker: child {} is in the wrong child-kind list",
                    child.path()
                );
                return false;
            }
            if let Some(prev) = &prev_path {
                if prev.cmp_segments(child.path()) != std::cmp::Ordering::Less {
                    log::error!(
                        "checker: siblings {} and {} are not strictly increasing",
                        prev,
                        child.path()
                    );
                    return false;
                }
            }
            prev_path = Some(child.path().clone());
        }

        for &child_id in &child_ids {
            if !validate_subtree(arena, child_id, visited) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node as TreeNode;

    fn p(s: &str) -> Path {
        Path::new(s).unwrap()
    }

    #[test]
    fn uninitialized_empty_tree_is_valid() {
        let arena: Arena<TreeNode> = Arena::new();
        assert!(is_valid(false, &arena, None, 0));
    }

    #[test]
    fn uninitialized_with_root_is_invalid() {
        let mut arena = Arena::new();
        let root = TreeNode::create(&mut arena, None, p("r"), false, Vec::new()).unwrap();
        assert!(!is_valid(false, &arena, Some(root), 1));
    }

    #[test]
    fn valid_tree_passes() {
        let mut arena = Arena::new();
        let root = TreeNode::create(&mut arena, None, p("r"), false, Vec::new()).unwrap();
        TreeNode::create(&mut arena, Some(root), p("r/a"), false, Vec::new()).unwrap();
        TreeNode::create(&mut arena, Some(root), p("r/b"), false, Vec::new()).unwrap();
        assert!(is_valid(true, &arena, Some(root), 3));
    }

    #[test]
    fn wrong_expected_count_fails() {
        let mut arena = Arena::new();
        let root = TreeNode::create(&mut arena, None, p("r"), false, Vec::new()).unwrap();
        TreeNode::create(&mut arena, Some(root), p("r/a"), false, Vec::new()).unwrap();
        assert!(!is_valid(true, &arena, Some(root), 5));
    }

    #[test]
    fn root_with_parent_fails() {
        let mut arena = Arena::new();
        let root = TreeNode::create(&mut arena, None, p("r"), false, Vec::new()).unwrap();
        let child = TreeNode::create(&mut arena, Some(root), p("r/a"), false, Vec::new()).unwrap();
        // Pretend `child` were (incorrectly) passed in as the root.
        assert!(!is_valid(true, &arena, Some(child), 2));
    }
}
