use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use haven::config::Config;
use haven::handlers::upload;
use haven::http::request::{Method, Request, RequestBuilder};
use haven::http::response::StatusCode;

static NEXT_DIR: AtomicU32 = AtomicU32::new(0);

/// Fresh document root with an `uploads/` subdirectory.
fn temp_config() -> (Config, PathBuf) {
    let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
    let root = std::env::temp_dir().join(format!("haven-upload-{}-{n}", std::process::id()));
    std::fs::create_dir_all(root.join("uploads")).unwrap();

    let mut cfg = Config::default();
    cfg.static_files.root = root.clone();
    (cfg, root)
}

fn upload_request(content_type: &str, body: &[u8]) -> Request {
    RequestBuilder::new()
        .method(Method::Post)
        .path("/uploads")
        .header("Content-Type", content_type)
        .header("Content-Length", body.len().to_string())
        .body(body.to_vec())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_form_data_appended_to_data_txt() {
    let (cfg, root) = temp_config();

    let req = upload_request("application/x-www-form-urlencoded", b"name=margo&age=30");
    let response = upload::handle(&req, &cfg).await;
    assert_eq!(response.status, StatusCode::Ok);

    let contents = std::fs::read_to_string(root.join("uploads/data.txt")).unwrap();
    assert_eq!(contents, "name=margo&age=30\n");
}

#[tokio::test]
async fn test_form_data_successive_posts_accumulate() {
    let (cfg, root) = temp_config();

    for body in [b"a=1".as_slice(), b"b=2", b"c=3"] {
        let req = upload_request("application/x-www-form-urlencoded", body);
        let response = upload::handle(&req, &cfg).await;
        assert_eq!(response.status, StatusCode::Ok);
    }

    let contents = std::fs::read_to_string(root.join("uploads/data.txt")).unwrap();
    assert_eq!(contents.lines().last().unwrap(), "c=3");
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test]
async fn test_json_appended_with_json_content_type() {
    let (cfg, root) = temp_config();

    let req = upload_request("application/json", b"{\"k\":\"v\"}");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        response.headers.get("Content-Type").unwrap(),
        "application/json"
    );

    let contents = std::fs::read_to_string(root.join("uploads/data.json")).unwrap();
    assert_eq!(contents, "{\"k\":\"v\"}\n");
}

#[tokio::test]
async fn test_empty_json_body_is_rejected() {
    let (cfg, root) = temp_config();

    let req = upload_request("application/json", b"");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::BadRequest);
    assert!(!root.join("uploads/data.json").exists());
}

#[tokio::test]
async fn test_invalid_json_is_stored_as_opaque_bytes() {
    // Content is trusted; only emptiness is checked
    let (cfg, root) = temp_config();

    let req = upload_request("application/json", b"not json at all");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::Ok);
    let contents = std::fs::read_to_string(root.join("uploads/data.json")).unwrap();
    assert_eq!(contents, "not json at all\n");
}

#[tokio::test]
async fn test_multipart_single_part_written_verbatim() {
    let (cfg, root) = temp_config();

    let body = b"--XYZ\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"hi.txt\"\r\n\
\r\n\
hello\r\n\
--XYZ--\r\n";
    let req = upload_request("multipart/form-data; boundary=XYZ", body);
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::Ok);
    let saved = std::fs::read(root.join("uploads/upload_0")).unwrap();
    assert_eq!(saved, b"hello".to_vec());
}

#[tokio::test]
async fn test_multipart_parts_get_sequential_filenames() {
    let (cfg, root) = temp_config();

    let body = b"--sep\r\n\
Content-Disposition: form-data; name=\"a\"\r\n\
\r\n\
first\r\n\
--sep\r\n\
Content-Disposition: form-data; name=\"b\"\r\n\
\r\n\
second\r\n\
--sep--\r\n";
    let req = upload_request("multipart/form-data; boundary=sep", body);
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        std::fs::read(root.join("uploads/upload_0")).unwrap(),
        b"first".to_vec()
    );
    assert_eq!(
        std::fs::read(root.join("uploads/upload_1")).unwrap(),
        b"second".to_vec()
    );
}

#[tokio::test]
async fn test_multipart_without_boundary_parameter() {
    let (cfg, _root) = temp_config();

    let req = upload_request("multipart/form-data", b"--XYZ\r\n\r\nhello\r\n--XYZ--");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_multipart_boundary_not_in_body() {
    let (cfg, root) = temp_config();

    let req = upload_request("multipart/form-data; boundary=XYZ", b"nothing delimited");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::BadRequest);
    assert!(!root.join("uploads/upload_0").exists());
}

#[tokio::test]
async fn test_content_type_match_is_case_insensitive() {
    let (cfg, root) = temp_config();

    let req = upload_request("Application/JSON; charset=utf-8", b"{}");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert!(root.join("uploads/data.json").exists());
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let (cfg, _root) = temp_config();

    let req = upload_request("text/csv", b"a,b,c");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_missing_uploads_directory_is_server_error() {
    let (mut cfg, _root) = temp_config();
    cfg.uploads.dir = Some(PathBuf::from("/nonexistent/haven-uploads"));

    let req = upload_request("application/json", b"{}");
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::InternalServerError);
}

#[tokio::test]
async fn test_path_normalization_trims_and_lowercases() {
    let (cfg, root) = temp_config();

    let req = RequestBuilder::new()
        .method(Method::Post)
        .path(" /UPLOADS ")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(b"x=1".to_vec())
        .build()
        .unwrap();
    let response = upload::handle(&req, &cfg).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert!(root.join("uploads/data.txt").exists());
}
