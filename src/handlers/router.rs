use crate::config::Config;
use crate::handlers::{static_files, upload};
use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// Dispatches a request by method and path.
///
/// GET maps `/` to the welcome page and appends any other target verbatim to
/// the document root; `..` segments are not rejected (accepted risk, see
/// DESIGN.md). POST recognizes only `/uploads`. Everything else is 405.
pub async fn route(request: &Request, cfg: &Config) -> Response {
    match &request.method {
        Method::Get => {
            let root = cfg.static_files.root.display();
            let path = if request.path == "/" {
                format!("{}/{}", root, cfg.static_files.welcome_page)
            } else {
                format!("{}{}", root, request.path)
            };

            static_files::serve(&path).await
        }

        Method::Post => {
            if request.path == "/uploads" {
                upload::handle(request, cfg).await
            } else {
                Response::not_found(&request.path)
            }
        }

        Method::Other(method) => {
            tracing::warn!(method = %method, "Unsupported method");
            Response::method_not_allowed()
        }
    }
}
