// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::TreeError;

/// The raw data structure (The "Truth"): one filesystem directory known to
/// the browser. Children are exclusively owned, so dropping a node drops its
/// whole subtree. Node identity is `full_path`, which is unique within a
/// tree because it mirrors a filesystem snapshot walked top-down.
#[derive(Debug, Clone, PartialEq)]
pub struct DirNode {
    pub name: String,
    pub full_path: PathBuf,
    pub children: Vec<DirNode>,
    /// Position within the parent's `children` (0 for the root).
    pub index_as_child: usize,
    /// View state, user controlled.
    pub is_expanded: bool,
    /// True for exactly one node in the tree once a session is initialized.
    pub is_selected: bool,
    /// True once a scan of this directory actually discovered a child.
    /// A node discovered by an ancestor's scan but not yet scanned itself
    /// (a placeholder) keeps this false.
    pub is_children_loaded: bool,
}

/// Direction of a selection move through the flattened view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

impl DirNode {
    /// A placeholder node: name and path recorded, nothing scanned yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let full_path: PathBuf = path.into();
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| full_path.to_string_lossy().into_owned());
        Self {
            name,
            full_path,
            children: Vec::new(),
            index_as_child: 0,
            is_expanded: false,
            is_selected: false,
            is_children_loaded: false,
        }
    }

    /// Scans the directory at `full_path`, `depth` levels below this node.
    /// Depth 0 records nothing beyond what the constructor already stored.
    ///
    /// Entries named `.`/`..`, dotfiles, and non-directories are skipped.
    /// The directory check uses `DirEntry::file_type`, which does not follow
    /// symlinks, so a symlinked directory is excluded and link cycles cannot
    /// form during the walk.
    ///
    /// `is_children_loaded` flips to true only once a directory child is
    /// discovered. A directory with zero subdirectories therefore stays
    /// indistinguishable from a placeholder and gets re-scanned on its next
    /// expansion; the re-scan is cheap and keeps the flag semantics simple.
    ///
    /// On failure the node keeps every child loaded so far: `ScanFailed`
    /// means this directory could not be opened at all, `PartialLoad`
    /// aggregates failures somewhere in the recursive descent.
    pub fn load(&mut self, depth: usize) -> Result<(), TreeError> {
        if depth == 0 {
            return Ok(());
        }

        let entries = fs::read_dir(&self.full_path).map_err(|source| TreeError::ScanFailed {
            path: self.full_path.clone(),
            source,
        })?;

        let mut failures = 0;
        for entry in entries {
            let Ok(entry) = entry else {
                failures += 1;
                continue;
            };
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }

            let mut child = DirNode::new(entry.path());
            child.index_as_child = self.children.len();
            if child.load(depth - 1).is_err() {
                failures += 1;
            }
            self.children.push(child);
            self.is_children_loaded = true;
        }

        if failures > 0 {
            Err(TreeError::PartialLoad {
                path: self.full_path.clone(),
                failures,
            })
        } else {
            Ok(())
        }
    }

    /// Flips the expansion flag, lazily materializing the subtree: a node
    /// that was never scanned itself is loaded `load_depth` levels deep on
    /// its first expansion, growing the visible frontier by one load-depth
    /// increment. Children already loaded are never re-scanned.
    pub fn toggle_expansion(&mut self, load_depth: usize) -> Result<(), TreeError> {
        self.is_expanded = !self.is_expanded;
        if !self.is_children_loaded {
            self.load(load_depth)
        } else {
            Ok(())
        }
    }

    /// Runs `action` on the node at `target_path`, pruning branches whose
    /// path prefix cannot contain it. Returns whether the node was found.
    pub fn for_node_at<F>(&mut self, target_path: &Path, action: &mut F) -> bool
    where
        F: FnMut(&mut DirNode),
    {
        if self.full_path == target_path {
            action(self);
            return true;
        }
        if target_path.starts_with(&self.full_path) {
            for child in &mut self.children {
                if child.for_node_at(target_path, action) {
                    return true;
                }
            }
        }
        false
    }

    #[cfg(test)]
    pub fn count_selected(&self) -> usize {
        usize::from(self.is_selected)
            + self
                .children
                .iter()
                .map(|c| c.count_selected())
                .sum::<usize>()
    }
}

/// One visible node, paired with its depth below the root.
#[derive(Debug, Clone, Copy)]
pub struct FlatEntry<'a> {
    pub node: &'a DirNode,
    pub depth: usize,
}

/// Pre-order projection of the visible tree: the root always appears, a
/// node's children appear iff the node is expanded. This is the single
/// source of truth for navigation order; it is recomputed from scratch on
/// every query and must never be cached across expansion changes.
pub fn flatten(root: &DirNode) -> Vec<FlatEntry<'_>> {
    let mut out = Vec::new();
    flatten_into(root, 0, &mut out);
    out
}

fn flatten_into<'a>(node: &'a DirNode, depth: usize, out: &mut Vec<FlatEntry<'a>>) {
    out.push(FlatEntry { node, depth });
    if node.is_expanded {
        for child in &node.children {
            flatten_into(child, depth + 1, out);
        }
    }
}

/// Pure query for the entry adjacent to `selected` in flatten order.
/// Returns `None` when the selection sits at a boundary of the visible
/// sequence, or when `selected` is not visible at all; in both cases the
/// selection stays where it is. Flipping the `is_selected` flags is the
/// caller's job, which keeps the selection change atomic.
pub fn move_selection(root: &DirNode, selected: &Path, direction: Direction) -> Option<PathBuf> {
    let flat = flatten(root);
    let idx = flat
        .iter()
        .position(|entry| entry.node.full_path.as_path() == selected)?;

    let new_idx = match direction {
        Direction::Up => idx.checked_sub(1)?,
        Direction::Down => {
            if idx + 1 < flat.len() {
                idx + 1
            } else {
                return None;
            }
        }
    };

    Some(flat[new_idx].node.full_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn node(name: &str, path: &str, children: Vec<DirNode>) -> DirNode {
        let mut children = children;
        for (i, child) in children.iter_mut().enumerate() {
            child.index_as_child = i;
        }
        DirNode {
            name: name.to_string(),
            full_path: PathBuf::from(path),
            children,
            index_as_child: 0,
            is_expanded: false,
            is_selected: false,
            is_children_loaded: true,
        }
    }

    /// root (expanded)
    ///   a  (expanded)
    ///     a1
    ///   b  (collapsed, hides b1)
    fn mock_tree() -> DirNode {
        let mut root = node(
            "root",
            "/root",
            vec![
                node("a", "/root/a", vec![node("a1", "/root/a/a1", vec![])]),
                node("b", "/root/b", vec![node("b1", "/root/b/b1", vec![])]),
            ],
        );
        root.is_expanded = true;
        root.children[0].is_expanded = true;
        root.is_selected = true;
        root
    }

    fn flat_names(root: &DirNode) -> Vec<String> {
        flatten(root).iter().map(|e| e.node.name.clone()).collect()
    }

    #[test]
    fn test_flatten_order_skips_collapsed_subtrees() {
        let root = mock_tree();
        assert_eq!(flat_names(&root), vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_flatten_depths_follow_nesting() {
        let root = mock_tree();
        let depths: Vec<usize> = flatten(&root).iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_move_down_walks_the_visible_sequence() {
        let root = mock_tree();
        let next = move_selection(&root, Path::new("/root"), Direction::Down);
        assert_eq!(next, Some(PathBuf::from("/root/a")));
        let next = move_selection(&root, Path::new("/root/a/a1"), Direction::Down);
        assert_eq!(next, Some(PathBuf::from("/root/b")));
    }

    #[test]
    fn test_move_up_is_the_inverse_of_move_down() {
        let root = mock_tree();
        let flat: Vec<PathBuf> = flatten(&root)
            .iter()
            .map(|e| e.node.full_path.clone())
            .collect();
        for i in 1..flat.len() {
            assert_eq!(
                move_selection(&root, &flat[i], Direction::Up).as_deref(),
                Some(flat[i - 1].as_path())
            );
            assert_eq!(
                move_selection(&root, &flat[i - 1], Direction::Down).as_deref(),
                Some(flat[i].as_path())
            );
        }
    }

    #[test]
    fn test_moves_past_either_end_leave_selection_unchanged() {
        let root = mock_tree();
        assert_eq!(move_selection(&root, Path::new("/root"), Direction::Up), None);
        assert_eq!(
            move_selection(&root, Path::new("/root/b"), Direction::Down),
            None
        );
    }

    #[test]
    fn test_move_from_invisible_node_is_a_noop() {
        let root = mock_tree();
        // b1 exists in the tree but b is collapsed, so b1 is not visible
        assert_eq!(
            move_selection(&root, Path::new("/root/b/b1"), Direction::Down),
            None
        );
    }

    #[test]
    fn test_load_keeps_only_visible_subdirectories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();
        fs::create_dir(tmp.path().join(".hidden")).unwrap();
        File::create(tmp.path().join("b.txt")).unwrap();

        let mut root = DirNode::new(tmp.path());
        root.load(1).unwrap();

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "a");
        assert!(root.is_children_loaded);
    }

    #[test]
    fn test_load_respects_the_depth_bound() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();

        let mut root = DirNode::new(tmp.path());
        root.load(2).unwrap();

        let a = &root.children[0];
        assert!(a.is_children_loaded);

        // b sits one level past the bound: known by name and path only
        let b = &a.children[0];
        assert_eq!(b.name, "b");
        assert_eq!(b.full_path, tmp.path().join("a/b"));
        assert!(b.children.is_empty());
        assert!(!b.is_children_loaded);
    }

    #[test]
    fn test_expanding_a_placeholder_scans_it() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();

        let mut root = DirNode::new(tmp.path());
        root.load(1).unwrap();

        let a = &mut root.children[0];
        assert!(!a.is_children_loaded);
        a.toggle_expansion(3).unwrap();

        assert!(a.is_expanded);
        assert!(a.is_children_loaded);
        assert_eq!(a.children[0].name, "b");
    }

    #[test]
    fn test_toggling_twice_restores_state_without_rescanning() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();

        let mut root = DirNode::new(tmp.path());
        root.load(2).unwrap();

        let before = root.children.clone();
        root.toggle_expansion(3).unwrap();
        assert!(root.is_expanded);
        root.toggle_expansion(3).unwrap();
        assert!(!root.is_expanded);
        // already-loaded children are never duplicated or re-fetched
        assert_eq!(root.children, before);
    }

    #[test]
    fn test_directory_without_subdirectories_stays_unloaded() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("only-a-file.txt")).unwrap();

        let mut root = DirNode::new(tmp.path());
        root.load(3).unwrap();

        // zero directory children means the loaded flag never flips, so the
        // next expansion scans again (and again finds nothing)
        assert!(!root.is_children_loaded);
        root.toggle_expansion(3).unwrap();
        assert!(root.children.is_empty());
        assert!(!root.is_children_loaded);
    }

    #[test]
    fn test_load_on_missing_directory_reports_scan_failure() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("never-created");

        let mut root = DirNode::new(&gone);
        let err = root.load(1).unwrap_err();
        assert!(matches!(err, TreeError::ScanFailed { .. }));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_for_node_at_reaches_nested_nodes() {
        let mut root = mock_tree();
        let mut hits = 0;
        let found = root.for_node_at(Path::new("/root/a/a1"), &mut |n| {
            hits += 1;
            n.is_expanded = true;
        });
        assert!(found);
        assert_eq!(hits, 1);
        assert!(root.children[0].children[0].is_expanded);

        let found = root.for_node_at(Path::new("/elsewhere"), &mut |_| hits += 1);
        assert!(!found);
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_children_record_their_sibling_index() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("x")).unwrap();
        fs::create_dir(tmp.path().join("y")).unwrap();

        let mut root = DirNode::new(tmp.path());
        root.load(1).unwrap();

        for (i, child) in root.children.iter().enumerate() {
            assert_eq!(child.index_as_child, i);
        }
    }
}
