//! HTTP API routes and handlers

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;
