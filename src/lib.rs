//! Haven - Minimal Static File & Upload Server
//!
//! Core library for HTTP parsing, routing, static files and uploads.

pub mod config;
pub mod handlers;
pub mod http;
pub mod server;
