pub mod board_io;
pub mod config_io;
pub mod file_store;
pub mod lock;
pub mod rest_store;
pub mod state;
pub mod store;
pub mod watcher;
