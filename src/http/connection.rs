use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::Config;
use crate::handlers::router;
use crate::http::parser;
use crate::http::response::Response;
use crate::http::writer;

/// Cap on the initial read: the request line, headers and as much of the
/// body as fits arrive in one receive.
const INITIAL_READ_CAP: usize = 65535;

/// Chunk size for draining the rest of a declared body.
const BODY_READ_CHUNK: usize = 8192;

/// Handles one accepted connection: read, parse, route, respond, close.
///
/// The stream is owned exclusively by this handler and dropped when the
/// response has been sent or an error occurs.
pub struct Connection {
    stream: TcpStream,
    cfg: Arc<Config>,
}

impl Connection {
    pub fn new(stream: TcpStream, cfg: Arc<Config>) -> Self {
        Self { stream, cfg }
    }

    /// Never fails: every error is either mapped to an HTTP response or
    /// logged while the connection is torn down.
    pub async fn run(mut self) {
        let response = self.process().await;

        match timeout(
            self.cfg.io_timeout(),
            writer::write_response(&mut self.stream, &response),
        )
        .await
        {
            Err(_) => {
                tracing::warn!("Timed out writing response; dropping connection");
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to send response");
            }
            Ok(Ok(())) => {}
        }
    }

    /// Produces the response for whatever the peer sent. Never fails; every
    /// error path maps to an HTTP error response.
    async fn process(&mut self) -> Response {
        let mut buf = vec![0u8; INITIAL_READ_CAP];

        let received = match timeout(self.cfg.io_timeout(), self.stream.read(&mut buf)).await {
            Err(_) => {
                tracing::warn!("Timed out waiting for request data");
                return Response::internal_error();
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Failed to read request");
                return Response::internal_error();
            }
            Ok(Ok(n)) => n,
        };

        if received == 0 {
            // Peer connected and went away; parsing the empty buffer below
            // yields the 400 it deserves.
            tracing::info!("Client disconnected without sending data");
        }
        buf.truncate(received);

        let mut request = match parser::parse_request(&buf) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = ?e, "Malformed request");
                return Response::bad_request();
            }
        };

        if let Some(response) = self.complete_body(&mut request).await {
            return response;
        }

        let response = router::route(&request, &self.cfg).await;
        tracing::info!(
            method = request.method.as_str(),
            path = %request.path,
            status = response.status.as_u16(),
            "Request handled"
        );
        response
    }

    /// Reconciles the buffered body against `Content-Length`: trims excess
    /// bytes and keeps reading until the declared length is satisfied.
    ///
    /// Returns `Some(response)` when body completion failed and the request
    /// must be aborted.
    async fn complete_body(&mut self, request: &mut crate::http::request::Request) -> Option<Response> {
        let declared = request.content_length();

        if request.body.len() > declared {
            request.body.truncate(declared);
            return None;
        }

        while request.body.len() < declared {
            let mut chunk = [0u8; BODY_READ_CHUNK];
            let wanted = (declared - request.body.len()).min(BODY_READ_CHUNK);

            let n = match timeout(self.cfg.io_timeout(), self.stream.read(&mut chunk[..wanted])).await {
                Err(_) => {
                    tracing::warn!(declared, got = request.body.len(), "Timed out reading request body");
                    return Some(Response::internal_error());
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Failed to read request body");
                    return Some(Response::internal_error());
                }
                Ok(Ok(n)) => n,
            };

            if n == 0 {
                tracing::warn!(
                    declared,
                    got = request.body.len(),
                    "Client closed connection before sending the whole body"
                );
                return Some(Response::bad_request());
            }

            request.body.extend_from_slice(&chunk[..n]);
        }

        None
    }
}
