pub mod api;
pub mod config;
pub mod models;
pub mod store;
pub mod tree;

pub use api::{ApiError, NoteApiClient};
pub use config::ClientConfig;
pub use models::{Note, NotePage, SearchParams};
pub use store::{NoteStore, OpStatus, Operation};
pub use tree::{NodeKind, TreeNode};
