pub mod clock;
pub mod commands;
pub mod filter;
pub mod sort;
pub mod stats;
