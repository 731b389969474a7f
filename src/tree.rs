use crate::models::Note;

/// In-memory cache of the remote repository's directory structure.
///
/// Nodes are keyed by their full slash-joined path from the root (the root
/// itself has an empty path). Children lists are kept sorted with
/// directories before files, then lexicographic by path. The `cached` flag
/// records whether this node's immediate children (for directories) or
/// content (for files) reflect a completed fetch; it says nothing about
/// ancestors or descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub cached: bool,
    pub kind: NodeKind,
}

/// A node is either a directory with children or a file. Files can never
/// carry children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Directory { children: Vec<TreeNode> },
    File {
        sha: String,
        content: Option<String>,
        size: u64,
    },
}

impl TreeNode {
    /// An empty root node, the seed for a freshly constructed store.
    pub fn root() -> Self {
        Self {
            name: "root".to_string(),
            path: String::new(),
            cached: false,
            kind: NodeKind::Directory { children: Vec::new() },
        }
    }

    fn new_dir(name: &str, path: String, cached: bool) -> Self {
        Self {
            name: name.to_string(),
            path,
            cached,
            kind: NodeKind::Directory { children: Vec::new() },
        }
    }

    fn from_note(name: &str, note: &Note, cached: bool) -> Self {
        let kind = if note.is_dir {
            NodeKind::Directory { children: Vec::new() }
        } else {
            NodeKind::File {
                sha: note.sha.clone(),
                content: note.content.clone(),
                size: note.size,
            }
        };
        Self {
            name: name.to_string(),
            path: note.path.clone(),
            cached,
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> Option<&[TreeNode]> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<TreeNode>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// Depth-first search for the node with exactly this path. The root
    /// matches the empty string.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children()?.iter().find_map(|c| c.find(path))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut TreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children_mut()?.iter_mut().find_map(|c| c.find_mut(path))
    }

    /// Merge a batch of flat records into the tree.
    ///
    /// For each record the directory segments of its path are walked,
    /// creating missing intermediate directories, and the leaf node is
    /// inserted or replaced at its full path. When `cache` is given, every
    /// directory touched on the walk and the leaf take that flag; otherwise
    /// the leaf's flag is derived from whether the payload carried content.
    /// Merging an empty slice is a no-op.
    pub fn merge(&mut self, notes: &[Note], cache: Option<bool>) {
        for note in notes {
            self.insert(note, cache);
        }
    }

    fn insert(&mut self, note: &Note, cache: Option<bool>) {
        let (dir_path, leaf_name) = match note.path.rsplit_once('/') {
            Some((dirs, name)) => (dirs, name),
            None => ("", note.path.as_str()),
        };

        let mut cur = self;
        if !dir_path.is_empty() {
            for seg in dir_path.split('/') {
                let parent_path = cur.path.clone();
                let children = match cur.children_mut() {
                    Some(c) => c,
                    None => {
                        // A file already sits where the record wants a
                        // directory. Server paths are assumed well-formed,
                        // so just skip the record.
                        log::warn!("merge: path {} crosses a file node", note.path);
                        return;
                    }
                };
                if !children.iter().any(|c| c.name == seg) {
                    let path = join_path(&parent_path, seg);
                    children.push(TreeNode::new_dir(seg, path, cache.unwrap_or(false)));
                }
                if let Some(flag) = cache {
                    for c in children.iter_mut().filter(|c| c.name == seg) {
                        c.cached = flag;
                    }
                }
                sort_children(children);
                let pos = children
                    .iter()
                    .position(|c| c.name == seg)
                    .expect("directory inserted above");
                cur = &mut children[pos];
            }
        }

        let leaf_cached = cache
            .unwrap_or_else(|| note.content.as_deref().is_some_and(|c| !c.is_empty()));
        let leaf = TreeNode::from_note(leaf_name, note, leaf_cached);
        let children = match cur.children_mut() {
            Some(c) => c,
            None => {
                log::warn!("merge: parent of {} is a file node", note.path);
                return;
            }
        };
        match children.iter().position(|c| c.path == note.path) {
            Some(i) => children[i] = leaf,
            None => children.push(leaf),
        }
        sort_children(children);
        if let Some(flag) = cache {
            cur.cached = flag;
        }
    }

    /// Remove the node with the given path from its parent's children.
    ///
    /// A directory whose children list is found empty during the walk is
    /// pruned from its own parent. Pruning is shallow: it happens one level
    /// per stack frame with no re-scan, so empty directories elsewhere in
    /// the tree (or ones skipped by the removal shifting the iteration
    /// index) can persist until the next full refresh.
    pub fn delete(&mut self, path: &str) {
        let children = match self.children_mut() {
            Some(c) => c,
            None => return,
        };
        let mut i = 0;
        while i < children.len() {
            if children[i].path == path {
                children.remove(i);
                break;
            }
            children[i].delete(path);
            if children[i].is_dir() && children[i].children().is_some_and(|c| c.is_empty()) {
                children.remove(i);
            }
            i += 1;
        }
    }

    /// Names of the direct directory children of the node at `path`, for
    /// path autocompletion. Empty when the node is absent or has none.
    pub fn child_dirs(&self, path: &str) -> Vec<String> {
        match self.find(path).and_then(|n| n.children()) {
            Some(children) => children
                .iter()
                .filter(|c| c.is_dir())
                .map(|c| c.name.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, the root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |cs| cs.iter().map(TreeNode::node_count).sum())
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Directories first, then lexicographic by path.
fn sort_children(children: &mut [TreeNode]) {
    children.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.path.cmp(&b.path)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: Option<&str>) -> Note {
        Note {
            sha: format!("sha-{}", path),
            path: path.to_string(),
            content: content.map(str::to_string),
            size: content.map_or(0, |c| c.len() as u64),
            is_dir: false,
        }
    }

    fn dir(path: &str) -> Note {
        Note {
            sha: String::new(),
            path: path.to_string(),
            content: None,
            size: 0,
            is_dir: true,
        }
    }

    #[test]
    fn test_merge_creates_intermediate_dirs() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a/b.md", Some("x"))], None);

        let a = tree.find("a").expect("intermediate dir");
        assert!(a.is_dir());
        let b = tree.find("a/b.md").expect("leaf file");
        assert!(!b.is_dir());
        assert_eq!(b.name, "b.md");
        assert!(b.cached, "leaf with content should be cached");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let notes = vec![
            file("a/b.md", Some("x")),
            file("a/c.md", None),
            file("top.md", Some("y")),
        ];
        let mut once = TreeNode::root();
        once.merge(&notes, Some(true));

        let mut twice = TreeNode::root();
        twice.merge(&notes, Some(true));
        twice.merge(&notes, Some(true));

        assert_eq!(once.node_count(), twice.node_count());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty_slice_is_noop() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a/b.md", Some("x"))], Some(true));
        let before = tree.clone();

        tree.merge(&[], Some(false));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_every_merged_path_is_findable() {
        let paths = ["a/b/c.md", "a/d.md", "e.md", "a/b/f.md"];
        let mut tree = TreeNode::root();
        let notes: Vec<Note> = paths.iter().map(|p| file(p, None)).collect();
        tree.merge(&notes, Some(true));

        for p in paths {
            let node = tree.find(p).unwrap_or_else(|| panic!("missing {}", p));
            assert_eq!(node.path, p);
        }
    }

    #[test]
    fn test_find_root_by_empty_path() {
        let tree = TreeNode::root();
        assert_eq!(tree.find("").map(|n| n.path.as_str()), Some(""));
    }

    #[test]
    fn test_find_absent_path() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a/b.md", None)], None);
        assert!(tree.find("a/missing.md").is_none());
    }

    #[test]
    fn test_merge_replaces_existing_leaf() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a/b.md", None)], Some(false));
        let count = tree.node_count();

        tree.merge(&[file("a/b.md", Some("updated"))], None);
        assert_eq!(tree.node_count(), count, "replace must not duplicate");

        let b = tree.find("a/b.md").unwrap();
        match &b.kind {
            NodeKind::File { content, .. } => {
                assert_eq!(content.as_deref(), Some("updated"))
            }
            NodeKind::Directory { .. } => panic!("leaf must stay a file"),
        }
        assert!(b.cached);
    }

    #[test]
    fn test_children_sorted_dirs_first_then_path() {
        let mut tree = TreeNode::root();
        tree.merge(
            &[
                file("z.md", None),
                file("b/n.md", None),
                file("a.md", None),
                dir("m"),
            ],
            Some(false),
        );

        let names: Vec<&str> = tree
            .children()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "m", "a.md", "z.md"]);
    }

    #[test]
    fn test_cache_flag_marks_walked_dirs() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a/b/c.md", None)], Some(false));
        assert!(!tree.find("a").unwrap().cached);

        tree.merge(&[file("a/b/c.md", None)], Some(true));
        assert!(tree.find("a").unwrap().cached);
        assert!(tree.find("a/b").unwrap().cached);
        assert!(tree.find("a/b/c.md").unwrap().cached);
    }

    #[test]
    fn test_leaf_cache_derived_from_content_when_flag_omitted() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a.md", None), file("b.md", Some(""))], None);
        assert!(!tree.find("a.md").unwrap().cached);
        assert!(!tree.find("b.md").unwrap().cached, "empty content is not a fetch");

        tree.merge(&[file("c.md", Some("text"))], None);
        assert!(tree.find("c.md").unwrap().cached);
    }

    #[test]
    fn test_delete_then_find_returns_none() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a/b.md", None), file("a/c.md", None)], Some(true));

        tree.delete("a/b.md");
        assert!(tree.find("a/b.md").is_none());
        assert!(tree.find("a/c.md").is_some());
    }

    #[test]
    fn test_delete_prunes_empty_parent() {
        let mut tree = TreeNode::root();
        tree.merge(&[file("a/b.md", None)], Some(true));

        tree.delete("a/b.md");
        assert!(tree.find("a/b.md").is_none());
        assert!(tree.find("a").is_none(), "emptied parent should be pruned");
    }

    #[test]
    fn test_delete_leaves_unrelated_empty_branch() {
        // Pruning is shallow: an empty directory branch elsewhere in the
        // tree survives a delete and persists until the next full refresh.
        let mut tree = TreeNode::root();
        tree.merge(&[dir("x/y"), file("a/b.md", None)], Some(false));

        tree.delete("a/b.md");
        assert!(tree.find("a").is_none());
        assert!(tree.find("x/y").is_some(), "unrelated empty dir persists");
    }

    #[test]
    fn test_child_dirs_lists_direct_directories() {
        let mut tree = TreeNode::root();
        tree.merge(
            &[file("a/one.md", None), file("b/two.md", None), file("c.md", None)],
            Some(false),
        );

        assert_eq!(tree.child_dirs(""), vec!["a", "b"]);
        assert!(tree.child_dirs("a").is_empty());
        assert!(tree.child_dirs("missing").is_empty());
    }
}
