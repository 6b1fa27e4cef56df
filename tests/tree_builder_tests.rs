use repo_atlas::github::{
    NodeType, RepoNode, TreeItem, TreeItemKind, build_tree, find_or_create_directory,
};

use std::collections::HashSet;

// Helper to build a blob item with a size
fn blob(path: &str, size: u64) -> TreeItem {
    TreeItem {
        path: path.to_string(),
        mode: "100644".to_string(),
        kind: TreeItemKind::Blob,
        sha: "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3".to_string(),
        size: Some(size),
        url: None,
    }
}

// Helper to build a tree (directory) item
fn tree(path: &str) -> TreeItem {
    TreeItem {
        path: path.to_string(),
        mode: "040000".to_string(),
        kind: TreeItemKind::Tree,
        sha: "4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string(),
        size: None,
        url: None,
    }
}

fn built(items: &[TreeItem]) -> RepoNode {
    let mut root = RepoNode::root("fixture");
    build_tree(items, &mut root);
    root
}

fn child<'a>(node: &'a RepoNode, name: &str) -> &'a RepoNode {
    node.children
        .as_ref()
        .and_then(|children| children.iter().find(|c| c.name == name))
        .unwrap_or_else(|| panic!("expected child '{name}' under '{}'", node.path))
}

#[test]
fn test_single_file_under_directory() {
    // The canonical two-item listing: a blob inside one directory
    let root = built(&[blob("src/a.ts", 10), tree("src")]);

    let children = root.children.as_ref().expect("root has children");
    assert_eq!(children.len(), 1);

    let src = child(&root, "src");
    assert_eq!(src.node_type, NodeType::Dir);
    assert_eq!(src.path, "src");

    let file = child(src, "a.ts");
    assert_eq!(file.node_type, NodeType::File);
    assert_eq!(file.path, "src/a.ts");
    assert_eq!(file.size, Some(10));
    assert!(file.children.is_none());
}

#[test]
fn test_round_trip_preserves_item_set() {
    let items = vec![
        tree("src"),
        blob("src/main.rs", 120),
        tree("src/nested"),
        blob("src/nested/deep.rs", 44),
        blob("README.md", 9),
        tree("docs"),
        blob("docs/guide.md", 300),
    ];
    let root = built(&items);

    let mut flattened: HashSet<(String, bool, Option<u64>)> = HashSet::new();
    root.walk(&mut |node| {
        if !node.path.is_empty() {
            flattened.insert((
                node.path.clone(),
                node.node_type == NodeType::File,
                node.size,
            ));
        }
    });

    let expected: HashSet<(String, bool, Option<u64>)> = items
        .iter()
        .map(|item| {
            (
                item.path.clone(),
                item.kind == TreeItemKind::Blob,
                item.size,
            )
        })
        .collect();

    assert_eq!(flattened, expected);
}

#[test]
fn test_parent_path_strictly_prefixes_children() {
    let root = built(&[
        tree("a"),
        tree("a/b"),
        blob("a/b/c.txt", 1),
        blob("a/top.txt", 2),
    ]);

    fn check(node: &RepoNode) {
        if let Some(children) = &node.children {
            for c in children {
                let expected = if node.path.is_empty() {
                    c.name.clone()
                } else {
                    format!("{}/{}", node.path, c.name)
                };
                assert_eq!(c.path, expected, "child path derives from its parent");
                check(c);
            }
        }
    }
    check(&root);
}

#[test]
fn test_files_never_have_children() {
    let root = built(&[
        tree("src"),
        blob("src/lib.rs", 5),
        blob("Cargo.toml", 3),
        tree("src/sub"),
        blob("src/sub/m.rs", 7),
    ]);

    root.walk(&mut |node| {
        if node.node_type == NodeType::File {
            assert!(node.children.is_none(), "file {} has children", node.path);
        } else {
            assert!(node.children.is_some(), "non-file {} lacks children", node.path);
        }
    });
}

#[test]
fn test_items_with_empty_paths_are_ignored() {
    let root = built(&[blob("", 99), blob("kept.txt", 1)]);

    let children = root.children.as_ref().expect("root has children");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "kept.txt");
}

#[test]
fn test_children_keep_listing_order() {
    let root = built(&[blob("zeta.txt", 1), blob("alpha.txt", 2), blob("mid.txt", 3)]);

    let names: Vec<&str> = root
        .children
        .as_ref()
        .expect("root has children")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["zeta.txt", "alpha.txt", "mid.txt"]);
}

#[test]
fn test_gitlink_rows_become_empty_directories() {
    let mut gitlink = tree("vendored");
    gitlink.kind = TreeItemKind::Other;
    gitlink.mode = "160000".to_string();
    let root = built(&[gitlink]);

    let node = child(&root, "vendored");
    assert_eq!(node.node_type, NodeType::Dir);
    assert!(node.children.as_ref().is_some_and(Vec::is_empty));
}

#[test]
fn test_find_or_create_directory_synthesizes_missing_segments() {
    let mut root = RepoNode::root("fixture");

    let dir = find_or_create_directory(&mut root, "vendor/libs");
    assert_eq!(dir.path, "vendor/libs");
    assert_eq!(dir.node_type, NodeType::Dir);

    let vendor = child(&root, "vendor");
    assert_eq!(vendor.path, "vendor");
    assert_eq!(vendor.node_type, NodeType::Dir);
    assert!(child(vendor, "libs").children.is_some());
}

#[test]
fn test_find_or_create_directory_reuses_existing_nodes() {
    let mut root = built(&[tree("vendor"), tree("vendor/libs")]);

    find_or_create_directory(&mut root, "vendor/libs");

    // No duplicate 'vendor' was created
    let top_level: Vec<&str> = root
        .children
        .as_ref()
        .expect("root has children")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(top_level, vec!["vendor"]);

    let vendor = child(&root, "vendor");
    let nested: Vec<&str> = vendor
        .children
        .as_ref()
        .expect("vendor has children")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(nested, vec!["libs"]);
}
