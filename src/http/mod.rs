//! HTTP protocol implementation.
//!
//! This module implements a minimal HTTP/1.1 server pipeline. Every response
//! closes the connection; there is no keep-alive, pipelining or chunked
//! transfer encoding.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection handler: read, parse, route, respond
//! - **`parser`**: parses a raw request buffer into a [`request::Request`]
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: content type detection based on file extensions
//!
//! # Request lifecycle
//!
//! ```text
//! accept → read (≤65535 bytes) → parse → complete body to Content-Length
//!        → route → write response → close
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
