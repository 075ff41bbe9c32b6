pub mod commands;
pub mod config;
pub mod error;
pub mod fuse;
pub mod git;
pub mod spinner;
pub mod utils;
