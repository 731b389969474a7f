use std::collections::HashMap;

use crate::api::{ApiError, NoteApiClient};
use crate::models::{Note, NotePage, SearchParams};
use crate::tree::TreeNode;

/// Store operations with an observable status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchTree,
    FetchNotes,
    FetchNote,
    Save,
    Delete,
    Search,
}

/// Lifecycle of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpStatus {
    #[default]
    Idle,
    Loading,
    Failed,
}

/// Owns the note tree cache plus the last fetched page of records and the
/// currently open note, and folds API results into them.
///
/// Mutations are serialized by `&mut self`: each completed network call is
/// applied atomically in a single method invocation. A failed fetch leaves
/// the tree untouched. There is no cancellation; a result from a superseded
/// fetch still merges, harmlessly, since nodes are keyed by path and the
/// last write wins.
pub struct NoteStore {
    api: NoteApiClient,
    tree: TreeNode,
    page: NotePage,
    current: Option<Note>,
    status: HashMap<Operation, OpStatus>,
}

impl NoteStore {
    pub fn new(api: NoteApiClient) -> Self {
        Self {
            api,
            tree: TreeNode::root(),
            page: NotePage::default(),
            current: None,
            status: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    pub fn notes(&self) -> &[Note] {
        &self.page.notes
    }

    pub fn page(&self) -> &NotePage {
        &self.page
    }

    pub fn current(&self) -> Option<&Note> {
        self.current.as_ref()
    }

    pub fn status(&self, op: Operation) -> OpStatus {
        self.status.get(&op).copied().unwrap_or_default()
    }

    /// Direct directory children of the node at `path`, for autocomplete.
    pub fn child_dirs(&self, path: &str) -> Vec<String> {
        self.tree.child_dirs(path)
    }

    fn set_status(&mut self, op: Operation, status: OpStatus) {
        self.status.insert(op, status);
    }

    /// Fetch the full repository tree and rebuild the cache from it.
    pub async fn fetch_tree(&mut self) -> Result<(), ApiError> {
        self.set_status(Operation::FetchTree, OpStatus::Loading);
        match self.api.get_notes_tree().await {
            Ok(notes) => {
                self.apply_tree_fetched(notes);
                self.set_status(Operation::FetchTree, OpStatus::Idle);
                Ok(())
            }
            Err(e) => {
                self.page.notes.clear();
                self.set_status(Operation::FetchTree, OpStatus::Failed);
                Err(e)
            }
        }
    }

    /// Fetch the notes directly under `path` and merge them as cached.
    ///
    /// Skipped without a network call when the node is already cached or
    /// has no file children to fetch.
    pub async fn fetch_notes(&mut self, path: &str) -> Result<(), ApiError> {
        if !self.should_fetch_notes(path) {
            log::debug!("skipping fetch for '{}': cached or nothing to fetch", path);
            return Ok(());
        }
        self.set_status(Operation::FetchNotes, OpStatus::Loading);
        match self.api.get_notes(path).await {
            Ok(notes) => {
                self.apply_notes_fetched(notes);
                self.set_status(Operation::FetchNotes, OpStatus::Idle);
                Ok(())
            }
            Err(e) => {
                self.page.notes.clear();
                self.set_status(Operation::FetchNotes, OpStatus::Failed);
                Err(e)
            }
        }
    }

    /// Fetch one note with content and make it current.
    pub async fn fetch_note(&mut self, path: &str) -> Result<&Note, ApiError> {
        self.current = None;
        self.set_status(Operation::FetchNote, OpStatus::Loading);
        match self.api.get_note(path).await {
            Ok(note) => {
                self.set_status(Operation::FetchNote, OpStatus::Idle);
                Ok(self.current.insert(note))
            }
            Err(e) => {
                self.set_status(Operation::FetchNote, OpStatus::Failed);
                Err(e)
            }
        }
    }

    /// Create or update a note on the server and fold the result into the
    /// fetched page.
    pub async fn save(
        &mut self,
        path: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<Note, ApiError> {
        self.set_status(Operation::Save, OpStatus::Loading);
        match self.api.save_note(path, content, sha).await {
            Ok(mut note) => {
                // The server response omits content; keep what was submitted.
                note.content = Some(content.to_string());
                self.apply_saved(note.clone());
                self.set_status(Operation::Save, OpStatus::Idle);
                Ok(note)
            }
            Err(e) => {
                self.set_status(Operation::Save, OpStatus::Failed);
                Err(e)
            }
        }
    }

    /// Delete a note on the server, then drop it from the page and the tree.
    pub async fn delete(&mut self, note: &Note) -> Result<(), ApiError> {
        self.set_status(Operation::Delete, OpStatus::Loading);
        match self.api.delete_note(&note.path, &note.sha).await {
            Ok(()) => {
                self.apply_deleted(&note.path);
                self.set_status(Operation::Delete, OpStatus::Idle);
                Ok(())
            }
            Err(e) => {
                self.set_status(Operation::Delete, OpStatus::Failed);
                Err(e)
            }
        }
    }

    /// Run a search and merge the result page into the tree as cached.
    pub async fn search(&mut self, params: &SearchParams) -> Result<(), ApiError> {
        self.set_status(Operation::Search, OpStatus::Loading);
        match self.api.search_notes(params).await {
            Ok(page) => {
                self.apply_search_results(page);
                self.set_status(Operation::Search, OpStatus::Idle);
                Ok(())
            }
            Err(e) => {
                self.page = NotePage::default();
                self.set_status(Operation::Search, OpStatus::Failed);
                Err(e)
            }
        }
    }

    /// A directory needs fetching when it is not yet cached and the tree
    /// listing showed file children under it.
    fn should_fetch_notes(&self, path: &str) -> bool {
        match self.tree.find(path) {
            Some(node) => {
                let has_files = node
                    .children()
                    .is_some_and(|cs| cs.iter().any(|c| !c.is_dir()));
                !node.cached && has_files
            }
            None => false,
        }
    }

    fn apply_tree_fetched(&mut self, notes: Vec<Note>) {
        let mut tree = TreeNode::root();
        tree.merge(&notes, Some(false));
        self.tree = tree;
        self.page.notes = notes;
    }

    fn apply_notes_fetched(&mut self, notes: Vec<Note>) {
        self.tree.merge(&notes, Some(true));
        self.page.notes = notes;
    }

    fn apply_search_results(&mut self, page: NotePage) {
        self.tree.merge(&page.notes, Some(true));
        self.page = page;
    }

    fn apply_saved(&mut self, note: Note) {
        self.page.notes.retain(|n| n.sha != note.sha);
        self.page.notes.push(note);
    }

    fn apply_deleted(&mut self, path: &str) {
        self.page.notes.retain(|n| n.path != path);
        self.tree.delete(path);
    }
}
