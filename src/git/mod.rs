pub mod remote;
pub mod repository;

pub use repository::find_repository_in_path;
