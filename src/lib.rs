// Library for tests to access modules

pub mod alert;
pub mod config;
pub mod history;
pub mod log_sink;
pub mod models;
pub mod monitor;
pub mod render;
pub mod stats;
pub mod sysinfo_source;
pub mod version;
