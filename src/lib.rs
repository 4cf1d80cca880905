pub mod app;
pub mod callrecord;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod handler;
