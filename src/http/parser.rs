use std::collections::HashMap;

use crate::http::request::{Method, Request};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Empty buffer or non-UTF-8 head section.
    InvalidRequest,
    /// Request line does not have exactly three tokens.
    InvalidRequestLine,
    /// Header line without a colon.
    InvalidHeader,
}

/// Parses a raw request buffer into a [`Request`].
///
/// The head section ends at the first blank line; both CRLF and bare LF line
/// endings are accepted. The body is everything after that blank line, taken
/// as-is; reconciling it against `Content-Length` (trimming or reading more
/// bytes) is the connection's job.
///
/// Header names are kept verbatim before the colon; values have one leading
/// run of spaces/tabs stripped. Duplicate names keep the last value.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let (head, body) = split_head(buf);

    let head_str = std::str::from_utf8(head).map_err(|_| ParseError::InvalidRequest)?;
    let mut lines = head_str.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut tokens = request_line.split_whitespace();

    let method_str = tokens.next().ok_or(ParseError::InvalidRequestLine)?;
    let path = tokens.next().ok_or(ParseError::InvalidRequestLine)?;
    let version = tokens.next().ok_or(ParseError::InvalidRequestLine)?;
    if tokens.next().is_some() {
        return Err(ParseError::InvalidRequestLine);
    }

    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            break;
        }

        let (name, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        headers.insert(
            name.to_string(),
            value.trim_start_matches([' ', '\t']).to_string(),
        );
    }

    Ok(Request {
        method: Method::from_token(method_str),
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body.to_vec(),
    })
}

/// Splits the buffer at the first blank line into (head, body).
///
/// When no blank line is present, the whole buffer is the head and the body
/// is empty.
fn split_head(buf: &[u8]) -> (&[u8], &[u8]) {
    let crlf = buf.windows(4).position(|w| w == b"\r\n\r\n");
    let lf = buf.windows(2).position(|w| w == b"\n\n");

    // The first blank line wins: an LF-terminated head may carry a body
    // that itself contains a CRLF pair (multipart payloads always do)
    match (crlf, lf) {
        (Some(c), Some(l)) if c < l => (&buf[..c], &buf[c + 4..]),
        (_, Some(l)) => (&buf[..l], &buf[l + 2..]),
        (Some(c), None) => (&buf[..c], &buf[c + 4..]),
        (None, None) => (buf, &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_request(req).unwrap();

        assert_eq!(parsed.method, Method::Get);
        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    }

    #[test]
    fn empty_buffer_is_invalid() {
        assert!(parse_request(b"").is_err());
    }
}
