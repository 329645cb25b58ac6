pub mod board;
pub mod config;
pub mod todo;
pub mod view;

pub use board::*;
pub use config::*;
pub use todo::*;
pub use view::*;
