//! Content type detection based on file extensions.

/// Maps a path's extension to a content type.
///
/// The table is deliberately small; anything unknown is served as
/// `text/plain`.
pub fn content_type_for(path: &str) -> &'static str {
    match extension(path) {
        "gif" => "image/gif",
        "html" => "text/html",
        "css" => "text/css",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "text/plain",
    }
}

/// Returns the substring after the last dot, or "" when there is none.
fn extension(path: &str) -> &str {
    path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type_for("/index.html"), "text/html");
        assert_eq!(content_type_for("/style.css"), "text/css");
        assert_eq!(content_type_for("/cat.gif"), "image/gif");
        assert_eq!(content_type_for("/photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for("/photo.jpeg"), "image/jpeg");
    }

    #[test]
    fn unknown_extension_is_plain_text() {
        assert_eq!(content_type_for("/archive.tar.gz"), "text/plain");
        assert_eq!(content_type_for("/README"), "text/plain");
    }
}
