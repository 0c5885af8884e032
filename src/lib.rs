pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod selection;
pub mod utils;
