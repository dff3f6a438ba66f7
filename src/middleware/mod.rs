//! Middleware module - CORS

pub mod cors;
