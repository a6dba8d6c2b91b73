use crate::support::tag;
use blossom_drive::tags::{create_tags_for_tree, create_tree_from_tags, update_tree_in_tags};
use blossom_drive::{DecodeMode, FileMetadata, Tree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Entry {
    File(Vec<String>, String, u64, String),
    Folder(Vec<String>),
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{1,2}", 1..4)
}

fn entry() -> impl Strategy<Value = Entry> {
    prop_oneof![
        (segments(), "[0-9a-f]{8}", 1u64..1_000_000, "(text|image)/[a-z]{0,4}")
            .prop_map(|(path, sha, size, mime)| Entry::File(path, sha, size, mime)),
        segments().prop_map(Entry::Folder),
    ]
}

/// Build a tree from random edits, skipping those that conflict
fn build_tree(entries: &[Entry]) -> Tree {
    let mut tree = Tree::new();
    for entry in entries {
        let _ = match entry {
            Entry::File(path, sha, size, mime) => tree
                .set_file(path.clone(), FileMetadata::new(sha.as_str(), *size, mime.as_str()))
                .map(|_| ()),
            Entry::Folder(path) => tree.get_folder(path.clone(), true).map(|_| ()),
        };
    }
    tree
}

proptest! {
    #[test]
    fn decode_of_encode_is_identity(entries in prop::collection::vec(entry(), 0..24)) {
        let tree = build_tree(&entries);
        let tags = create_tags_for_tree(&tree, true);
        let decoded = create_tree_from_tags(&tags, DecodeMode::Strict).unwrap();
        prop_assert_eq!(decoded, tree);
    }

    #[test]
    fn update_is_idempotent(entries in prop::collection::vec(entry(), 0..16)) {
        let tree = build_tree(&entries);
        let base = vec![tag(&["d", "drive"]), tag(&["x", "old", "stale.txt", "1", ""]), tag(&["client", "app"])];
        let once = update_tree_in_tags(&base, &tree, true);
        let twice = update_tree_in_tags(&once, &tree, true);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(&once[..2], &[tag(&["d", "drive"]), tag(&["client", "app"])][..]);
    }
}

#[test]
fn dropping_empty_folders_loses_only_empty_folders() {
    let mut tree = Tree::new();
    tree.set_file(["docs", "a.md"], FileMetadata::new("aa", 3, "text/markdown"))
        .unwrap();
    tree.get_folder("docs/drafts", true).unwrap();

    let decoded = create_tree_from_tags(&create_tags_for_tree(&tree, false), DecodeMode::Strict)
        .unwrap();
    assert!(decoded.get_file("docs/a.md").is_ok());
    assert!(decoded.find_folder("docs/drafts").is_err());
}

#[test]
fn move_is_visible_in_encoded_records() {
    let mut tree = Tree::new();
    tree.set_file("a/x.txt", FileMetadata::new("11", 1, "text/plain")).unwrap();
    tree.get_folder("b", true).unwrap();
    tree.move_node("a/x.txt", "b/y.txt").unwrap();

    assert_eq!(
        create_tags_for_tree(&tree, true),
        vec![tag(&["folder", "a"]), tag(&["x", "11", "b/y.txt", "1", "text/plain"])]
    );
}
