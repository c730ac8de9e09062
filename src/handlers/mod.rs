//! Request routing and the two request families it dispatches to: static
//! file serving and uploads.

pub mod multipart;
pub mod router;
pub mod static_files;
pub mod upload;

pub use multipart::{MultipartError, MultipartParser, Part};
