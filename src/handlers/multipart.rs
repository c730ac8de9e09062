//! Incremental multipart/form-data scanner.
//!
//! The parser is push-based: callers feed it body chunks as they arrive and
//! collect completed parts; `finish` reports whether the terminal boundary
//! was seen. Parts are split strictly on the literal delimiter (`--` plus
//! the declared boundary). Each part consists of a header block terminated
//! by the first blank line, then the raw payload running up to the CRLF that
//! precedes the next delimiter. The terminal boundary is the delimiter
//! immediately followed by `--`.

use std::collections::HashMap;

use bytes::{Buf, BytesMut};

#[derive(Debug, PartialEq, Eq)]
pub enum MultipartError {
    /// The delimiter never appeared in the body.
    BoundaryNotFound,
    /// A part's header block was not terminated by a blank line.
    UnterminatedHeaders,
    /// The body ended before the terminal boundary.
    UnterminatedPart,
}

impl std::fmt::Display for MultipartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipartError::BoundaryNotFound => write!(f, "boundary not found in request body"),
            MultipartError::UnterminatedHeaders => write!(f, "part headers not terminated"),
            MultipartError::UnterminatedPart => write!(f, "terminal boundary not found"),
        }
    }
}

impl std::error::Error for MultipartError {}

/// One boundary-delimited sub-message: its header block plus raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub headers: HashMap<String, String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for the first delimiter.
    Preamble,
    /// Just past a delimiter: expecting CRLF (next part) or `--` (end).
    AfterDelimiter,
    /// Collecting a part's header block.
    Headers,
    /// Collecting a part's payload up to CRLF + delimiter.
    Data,
    /// Terminal boundary seen; the rest of the input is ignored.
    Done,
}

pub struct MultipartParser {
    delimiter: Vec<u8>,
    buf: BytesMut,
    state: State,
    part_headers: HashMap<String, String>,
    part_data: Vec<u8>,
}

impl MultipartParser {
    /// `boundary` is the parameter value from the Content-Type header; the
    /// two-hyphen prefix of the wire delimiter is added here.
    pub fn new(boundary: &str) -> Self {
        Self {
            delimiter: format!("--{boundary}").into_bytes(),
            buf: BytesMut::new(),
            state: State::Preamble,
            part_headers: HashMap::new(),
            part_data: Vec::new(),
        }
    }

    /// Feeds one body chunk, returning the parts it completed.
    ///
    /// Chunks may split the delimiter, a header block or a payload at any
    /// byte; the parser carries the undecidable tail over to the next feed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Part> {
        self.buf.extend_from_slice(chunk);
        let mut completed = Vec::new();

        loop {
            match self.state {
                State::Preamble => {
                    match find(&self.buf, &self.delimiter) {
                        Some(pos) => {
                            self.buf.advance(pos + self.delimiter.len());
                            self.state = State::AfterDelimiter;
                        }
                        None => {
                            // Keep only a tail that a straddling delimiter
                            // could still start in
                            self.trim_to_tail(self.delimiter.len() - 1);
                            return completed;
                        }
                    }
                }

                State::AfterDelimiter => {
                    if self.buf.len() < 2 {
                        return completed;
                    }
                    if &self.buf[..2] == b"--" {
                        self.state = State::Done;
                    } else {
                        // Normally CRLF; anything else is skipped just the same
                        self.buf.advance(2);
                        self.state = State::Headers;
                    }
                }

                State::Headers => {
                    match find(&self.buf, b"\r\n\r\n") {
                        Some(pos) => {
                            self.part_headers = parse_part_headers(&self.buf[..pos]);
                            self.buf.advance(pos + 4);
                            self.state = State::Data;
                        }
                        None => return completed,
                    }
                }

                State::Data => {
                    // Payload runs to the CRLF owned by the next delimiter
                    let mut needle = Vec::with_capacity(2 + self.delimiter.len());
                    needle.extend_from_slice(b"\r\n");
                    needle.extend_from_slice(&self.delimiter);

                    match find(&self.buf, &needle) {
                        Some(pos) => {
                            self.part_data.extend_from_slice(&self.buf[..pos]);
                            self.buf.advance(pos + needle.len());

                            completed.push(Part {
                                headers: std::mem::take(&mut self.part_headers),
                                data: std::mem::take(&mut self.part_data),
                            });
                            self.state = State::AfterDelimiter;
                        }
                        None => {
                            // Everything except a possible needle prefix is
                            // settled payload
                            let keep = (needle.len() - 1).min(self.buf.len());
                            let settled = self.buf.len() - keep;
                            self.part_data.extend_from_slice(&self.buf[..settled]);
                            self.buf.advance(settled);
                            return completed;
                        }
                    }
                }

                State::Done => {
                    // Epilogue is ignored
                    self.buf.clear();
                    return completed;
                }
            }
        }
    }

    /// Call after the last chunk: succeeds only when the terminal boundary
    /// was seen.
    pub fn finish(self) -> Result<(), MultipartError> {
        match self.state {
            State::Done => Ok(()),
            State::Preamble => Err(MultipartError::BoundaryNotFound),
            State::Headers => Err(MultipartError::UnterminatedHeaders),
            State::AfterDelimiter | State::Data => Err(MultipartError::UnterminatedPart),
        }
    }

    fn trim_to_tail(&mut self, keep: usize) {
        if self.buf.len() > keep {
            let settled = self.buf.len() - keep;
            self.buf.advance(settled);
        }
    }
}

/// Extracts the `boundary=` parameter from a Content-Type header value.
///
/// The match on the parameter name is case-insensitive; the boundary itself
/// keeps its case. Surrounding quotes and trailing parameters are stripped.
pub fn boundary_param(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    let start = lower.find("boundary=")? + "boundary=".len();

    let rest = &content_type[start..];
    let value = rest.split(';').next().unwrap_or(rest).trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Part headers follow the same shape as request headers: name before the
/// colon, value after with leading whitespace stripped. Colonless lines are
/// skipped rather than rejected; part headers never influence routing.
fn parse_part_headers(block: &[u8]) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    let Ok(text) = std::str::from_utf8(block) else {
        return headers;
    };

    for line in text.split("\r\n") {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(
                name.to_string(),
                value.trim_start_matches([' ', '\t']).to_string(),
            );
        }
    }

    headers
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
