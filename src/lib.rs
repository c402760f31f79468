pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod labels;
pub mod middleware;
pub mod pagination;
pub mod services;
pub mod types;

#[cfg(test)]
pub mod testing;
