pub mod config;
pub mod menu;

pub use config::*;
pub use menu::*;
