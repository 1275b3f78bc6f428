pub mod app;
pub mod input;
pub mod render;
pub mod router;
pub mod sidebar;
pub mod theme;

pub use app::{RunOptions, run};
