//! Media delivery service for a movie-streaming backend.
//!
//! Stores uploaded video/image files under content-opaque UUID tokens and
//! serves them back over HTTP with byte-range support. Exposed as a library
//! so integration tests can build the router in-process.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod services;
