pub mod config;
pub mod diagnose;
pub mod fill;
pub mod on_air;
pub mod schedule;
pub mod timeline;
pub mod validate;
