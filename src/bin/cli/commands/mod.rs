pub mod ls;
pub mod rm;
pub mod save;
pub mod search;
pub mod show;
pub mod tree;
