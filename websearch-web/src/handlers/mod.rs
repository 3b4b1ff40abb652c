//! HTTP request handlers for the web server

pub mod config;
pub mod health;
pub mod invoke;
pub mod search;
pub mod types;

pub use config::*;
pub use health::*;
pub use invoke::*;
pub use search::*;

pub use types::*;
