pub mod actions;
pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod utils;
