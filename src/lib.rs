pub mod board;
pub mod config;
pub mod errors;
pub mod models;
pub mod project_list;
pub mod service;
pub mod store;
pub mod util;
