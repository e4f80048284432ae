// Lets `#[derive(Command)]` expand to `::promptbot::...` paths inside this crate too.
extern crate self as promptbot;

pub mod arguments;
pub mod bot;
pub mod commands;
pub mod config;
pub mod executor;
pub mod generator;
pub mod logging;
pub mod models;
pub mod platform;
pub mod registry;

// Re-export macros
pub use promptbot_derive::Command;
