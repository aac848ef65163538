pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod render;
pub mod schema;
pub mod simplify;
