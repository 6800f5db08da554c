pub mod config;
pub mod content;
pub mod logger;
pub mod og;
pub mod query_string;
pub mod server;
pub mod stats;
pub mod text_utils;
pub mod view;
