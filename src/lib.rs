//! Multi-tenant issue tracker API guarded by OIDC bearer tokens.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;

