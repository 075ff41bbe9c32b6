pub mod rewriter;
pub mod sink;
pub mod snapshot;
pub mod tree_fuser;
