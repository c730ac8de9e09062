use std::collections::HashMap;

/// HTTP request methods.
///
/// The server serves GET and accepts uploads via POST; every other method is
/// carried verbatim and answered with 405 Method Not Allowed by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    Get,
    /// POST - Submit data
    Post,
    /// Any other method token, kept as received
    Other(String),
}

impl Method {
    /// Parses an HTTP method token (case-sensitive, per RFC 9110).
    ///
    /// Unknown tokens are preserved in [`Method::Other`] so routing can
    /// answer 405 instead of rejecting the request outright.
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Other(s) => s.as_str(),
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Header keys are stored exactly as received (case-sensitive) and duplicate
/// header names keep the last value seen.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, or anything else)
    pub method: Method,
    /// The request target path (e.g., "/index.html")
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Request body, possibly empty
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects (used primarily by tests).
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Retrieves a header value by exact (case-sensitive) name.
    ///
    /// Lookup is deliberately case-sensitive: clients sending
    /// `content-length` instead of `Content-Length` are treated as if the
    /// header were absent, matching the server's documented behavior.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Declared body length from `Content-Length`.
    ///
    /// Returns 0 if the header is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Declared content type, or an empty string when absent.
    pub fn content_type(&self) -> &str {
        self.header("Content-Type").unwrap_or("").trim()
    }
}
