pub mod actor;
pub mod classify;
pub mod config;
pub mod item;
pub mod list;
pub mod session;
