//! SkyCards terminal UI
//!
//! Models for the search box, card deck, theme and status line, the local
//! store they persist to, and the shell that wires them to terminal input.

pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod saved_cities;
pub mod services;
pub mod shell;
pub mod storage;

pub use app_services::AppServices;
pub use shell::{Command, Shell};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
