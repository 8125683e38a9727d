pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout_store;
pub mod locator;
pub mod manager;
pub mod notify;
pub mod platform;
pub mod scheduler;
pub mod signals;
