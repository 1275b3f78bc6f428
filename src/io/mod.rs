pub mod config_io;
pub mod enabled_source;
pub mod prefs;
pub mod session;
