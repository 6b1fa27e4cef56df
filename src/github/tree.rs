//! Flat-listing to nested-tree reconstruction.

use std::collections::HashMap;

use super::types::{NodeType, RepoNode, TreeItem, TreeItemKind};

/// Builds the nested hierarchy for a flat recursive tree listing, attaching
/// every item under `root`.
///
/// Items are grouped by parent path (the path minus its last segment) and
/// attached recursively; children keep the order of the listing, no sorting
/// is applied. Items with an empty path are ignored.
pub fn build_tree(items: &[TreeItem], root: &mut RepoNode) {
    let mut items_by_parent: HashMap<&str, Vec<(&str, &TreeItem)>> = HashMap::new();

    for item in items {
        if item.path.is_empty() {
            continue;
        }
        let (parent_path, name) = split_last_segment(&item.path);
        items_by_parent
            .entry(parent_path)
            .or_default()
            .push((name, item));
    }

    attach_children("", root, &items_by_parent);
}

/// Splits `a/b/c` into `("a/b", "c")`; a bare segment has an empty parent.
fn split_last_segment(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

fn attach_children(
    parent_path: &str,
    parent: &mut RepoNode,
    items_by_parent: &HashMap<&str, Vec<(&str, &TreeItem)>>,
) {
    let Some(entries) = items_by_parent.get(parent_path) else {
        return;
    };

    for (name, item) in entries {
        let full_path = if parent_path.is_empty() {
            (*name).to_string()
        } else {
            format!("{parent_path}/{name}")
        };

        let node = if item.kind == TreeItemKind::Blob {
            RepoNode {
                name: (*name).to_string(),
                path: full_path,
                node_type: NodeType::File,
                size: item.size,
                children: None,
            }
        } else {
            // Trees recurse; gitlink rows stay as empty directories until
            // the submodule resolver replaces them.
            let mut node = RepoNode {
                name: (*name).to_string(),
                path: full_path.clone(),
                node_type: NodeType::Dir,
                size: None,
                children: Some(Vec::new()),
            };
            if item.kind == TreeItemKind::Tree {
                attach_children(&full_path, &mut node, items_by_parent);
            }
            node
        };

        if let Some(children) = parent.children.as_mut() {
            children.push(node);
        }
    }
}

/// Walks `path` below `root`, returning the final directory node and
/// synthesizing empty directory nodes for any missing segments.
pub fn find_or_create_directory<'a>(root: &'a mut RepoNode, path: &str) -> &'a mut RepoNode {
    let mut current = root;

    for part in path.split('/') {
        if part.is_empty() {
            continue;
        }

        let node = current;
        let child_path = if node.path.is_empty() {
            part.to_string()
        } else {
            format!("{}/{}", node.path, part)
        };
        let children = node.children.get_or_insert_with(Vec::new);

        let index = children
            .iter()
            .position(|child| child.name == part && child.node_type == NodeType::Dir)
            .unwrap_or_else(|| {
                children.push(RepoNode {
                    name: part.to_string(),
                    path: child_path,
                    node_type: NodeType::Dir,
                    size: None,
                    children: Some(Vec::new()),
                });
                children.len() - 1
            });

        current = &mut children[index];
    }

    current
}
