//! # Savora API
//!
//! actix-web surface for the session/identity subsystem: auth routes,
//! the authorization gate middleware, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
