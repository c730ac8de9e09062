use crate::http::mime;
use crate::http::response::Response;

/// Serves a resolved filesystem path as a static file.
///
/// The whole file is read into memory and returned with a content type
/// inferred from its extension. Any open/read failure becomes a 404 echoing
/// the path. No caching, no range requests, no directory listings.
pub async fn serve(path: &str) -> Response {
    match tokio::fs::read(path).await {
        Ok(contents) => {
            tracing::info!(path = %path, size = contents.len(), "Serving static file");
            Response::ok(contents, mime::content_type_for(path))
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Static file not found");
            Response::not_found(path)
        }
    }
}
