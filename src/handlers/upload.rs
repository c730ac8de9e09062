use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::handlers::multipart::{self, MultipartParser};
use crate::http::request::Request;
use crate::http::response::Response;

/// Handles `POST /uploads`, dispatching on the declared content type.
///
/// The uploads directory must already exist; the handler refuses to create
/// it. Output files are opened without any cross-connection locking, so
/// concurrent uploads can interleave (accepted risk, see DESIGN.md).
pub async fn handle(request: &Request, cfg: &Config) -> Response {
    let normalized = request.path.trim().to_lowercase();
    if normalized != "/uploads" {
        return Response::not_found(&normalized);
    }

    let dir = cfg.uploads_dir();
    match tokio::fs::metadata(&dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            tracing::error!(dir = %dir.display(), "Uploads path exists but is not a directory");
            return Response::internal_error();
        }
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "Uploads directory missing");
            return Response::internal_error();
        }
    }

    let content_type = request.content_type().to_string();
    let ct_lower = content_type.to_ascii_lowercase();

    if ct_lower.contains("application/x-www-form-urlencoded") {
        handle_form(&dir, &request.body).await
    } else if ct_lower.contains("application/json") {
        handle_json(&dir, &request.body).await
    } else if ct_lower.contains("multipart/form-data") {
        handle_multipart(&dir, &content_type, &request.body).await
    } else {
        tracing::warn!(content_type = %content_type, "Unsupported upload content type");
        Response::bad_request()
    }
}

/// Appends the raw body plus a newline to `data.txt`.
async fn handle_form(dir: &Path, body: &[u8]) -> Response {
    let target = dir.join("data.txt");
    if let Err(e) = append_line(&target, body).await {
        tracing::error!(file = %target.display(), error = %e, "Failed to append form data");
        return Response::internal_error();
    }

    tracing::info!(file = %target.display(), size = body.len(), "Form data saved");
    Response::ok("Data successfully uploaded and saved.\n", "text/plain")
}

/// Appends the raw body plus a newline to `data.json`.
///
/// The body is trusted as opaque bytes; the only validation is
/// non-emptiness.
async fn handle_json(dir: &Path, body: &[u8]) -> Response {
    if body.is_empty() {
        tracing::warn!("Empty JSON body received");
        return Response::bad_request();
    }

    let target = dir.join("data.json");
    if let Err(e) = append_line(&target, body).await {
        tracing::error!(file = %target.display(), error = %e, "Failed to append JSON data");
        return Response::internal_error();
    }

    tracing::info!(file = %target.display(), size = body.len(), "JSON data saved");
    Response::ok("JSON data successfully uploaded and saved.", "application/json")
}

/// Splits the body on the declared boundary and writes each part's payload
/// to `upload_<index>`, zero-based in order of appearance.
async fn handle_multipart(dir: &Path, content_type: &str, body: &[u8]) -> Response {
    let Some(boundary) = multipart::boundary_param(content_type) else {
        tracing::warn!(content_type = %content_type, "Boundary not found in Content-Type header");
        return Response::bad_request();
    };

    let mut parser = MultipartParser::new(&boundary);
    let parts = parser.feed(body);

    if let Err(e) = parser.finish() {
        tracing::warn!(boundary = %boundary, error = %e, "Malformed multipart body");
        return Response::bad_request();
    }

    for (index, part) in parts.iter().enumerate() {
        let target = dir.join(format!("upload_{index}"));
        if let Err(e) = tokio::fs::write(&target, &part.data).await {
            tracing::error!(file = %target.display(), error = %e, "Failed to write uploaded file");
            return Response::internal_error();
        }
        tracing::info!(file = %target.display(), size = part.data.len(), "File saved");
    }

    Response::ok("File(s) successfully uploaded and saved.", "text/plain")
}

async fn append_line(path: &Path, body: &[u8]) -> anyhow::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(body).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;

    Ok(())
}
