use serde::{Deserialize, Serialize};

/// A flat note record as returned by the notes API.
///
/// The same shape is used by every endpoint: listing, tree, search and
/// single-note fetches all return these records, differing only in which
/// fields the server bothers to populate (the tree endpoint omits content,
/// directory entries omit sha and size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub sha: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub is_dir: bool,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePage {
    pub total: usize,
    pub notes: Vec<Note>,
}

/// Parameters for the note search endpoint.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub page: Option<u32>,
    pub path: Option<String>,
    pub query: Option<String>,
}
