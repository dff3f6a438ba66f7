//! HTTP API - Routes, handlers, and wire types

pub mod form;
pub mod handlers;
pub mod routes;
pub mod types;
