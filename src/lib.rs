pub mod bootstrap;
pub mod config;
pub mod database;
pub mod error;
pub mod inspector;
pub mod pipeline;
