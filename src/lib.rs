pub mod api;
pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod render;
pub mod services;
pub mod shell;
pub mod validation;
