pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod directory;
pub mod error;
pub mod fixtures;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod store;
