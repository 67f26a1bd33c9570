//! End-to-end scenarios exercising the public API as a caller would, each
//! covering one property independent of internal module structure.

use namespace_tree::{Dt, Ft, NameSpaceTree, NamespaceTreeError};

#[test]
fn s1_dt_dump_is_preorder_by_path() {
    let mut tree: NameSpaceTree<Dt> = NameSpaceTree::new();
    tree.init().unwrap();
    tree.insert_dir("root").unwrap();
    tree.insert_dir("root/b").unwrap();
    tree.insert_dir("root/a").unwrap();
    tree.insert_dir("root/a/c").unwrap();

    let dump = tree.to_string().unwrap();
    let lines: Vec<_> = dump.lines().collect();
    assert_eq!(lines, vec!["root", "root/a", "root/a/c", "root/b"]);
}

#[test]
fn s2_ft_dump_lists_files_before_dirs_at_each_level() {
    let mut tree: NameSpaceTree<Ft> = NameSpaceTree::new();
    tree.init().unwrap();
    tree.insert_dir("root").unwrap();
    tree.insert_dir("root/sub").unwrap();
    tree.insert_file("root/z.txt", b"z".to_vec()).unwrap();
    tree.insert_file("root/a.txt", b"a".to_vec()).unwrap();

    let dump = tree.to_string().unwrap();
    let lines: Vec<_> = dump.lines().collect();
    assert_eq!(
        lines,
        vec!["Dir:  root", "File: root/a.txt", "File: root/z.txt", "Dir:  root/sub"]
    );
}

#[test]
fn s3_replace_file_contents_hands_back_the_previous_payload() {
    let mut tree: NameSpaceTree<Ft> = NameSpaceTree::new();
    tree.init().unwrap();
    tree.insert_dir("root").unwrap();
    tree.insert_file("root/notes.txt", b"draft one".to_vec())
        .unwrap();

    let previous = tree
        .replace_file_contents("root/notes.txt", b"draft two".to_vec())
        .unwrap();
    assert_eq!(previous, b"draft one");
    assert_eq!(
        tree.get_file_contents("root/notes.txt").unwrap(),
        b"draft two"
    );
}

#[test]
fn s4_failed_insert_rolls_back_the_whole_partial_chain() {
    let mut tree: NameSpaceTree<Ft> = NameSpaceTree::new();
    tree.init().unwrap();
    tree.insert_dir("root").unwrap();

    // Allow the first new node (root/a) to allocate, then fail on the
    // second (root/a/b.txt).
    namespace_tree::fault::arm(1);
    let result = tree.insert_file("root/a/b.txt", b"payload".to_vec());
    namespace_tree::fault::disarm();

    assert_eq!(result.unwrap_err(), NamespaceTreeError::MemoryError);
    assert!(!tree.contains_dir("root/a"));
    assert!(!tree.contains_file("root/a/b.txt"));
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn s5_inserting_through_a_file_short_circuits_as_not_a_directory() {
    let mut tree: NameSpaceTree<Ft> = NameSpaceTree::new();
    tree.init().unwrap();
    tree.insert_dir("root").unwrap();
    tree.insert_file("root/leaf", Vec::new()).unwrap();

    let err = tree.insert_dir("root/leaf/child").unwrap_err();
    assert_eq!(err, NamespaceTreeError::NotADirectory("root/leaf/child".to_string()));

    let err = tree
        .insert_file("root/leaf/child.txt", Vec::new())
        .unwrap_err();
    assert_eq!(
        err,
        NamespaceTreeError::NotADirectory("root/leaf/child.txt".to_string())
    );
}

#[test]
fn s6_destroy_resets_to_the_uninitialized_state() {
    let mut tree: NameSpaceTree<Dt> = NameSpaceTree::new();
    tree.init().unwrap();
    tree.insert_dir("root").unwrap();
    tree.insert_dir("root/a").unwrap();
    assert_eq!(tree.node_count(), 2);

    tree.destroy().unwrap();
    assert!(!tree.is_initialized());
    assert_eq!(tree.node_count(), 0);
    assert!(tree.to_string().is_none());

    // A destroyed tree can be reinitialized and reused from scratch.
    tree.init().unwrap();
    assert_eq!(tree.node_count(), 0);
    assert!(tree.to_string().unwrap().is_empty());
}
