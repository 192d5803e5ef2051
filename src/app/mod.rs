pub mod agent;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
mod context;
pub mod logging;
pub mod tools;
pub mod web;

pub use context::AppContext;
