pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod validation;

pub use app::{app, AppState};
