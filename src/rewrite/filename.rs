// src/rewrite/filename.rs
// =============================================================================
// Turns an asset URL into the file name we save it under.
//
// Example:
//   "https://cdn.example.test/attachments/1/2/logo.png" -> "logo.png"
//
// Only the last path segment is used, so two different URLs ending in the
// same name end up in the same local file (the later download wins).
// =============================================================================

// Derives the local file name for an asset URL
//
// Returns None when the URL has no path segment to name the file after,
// e.g. "https://cdn.example.test" or "https://cdn.example.test/a//".
// "." and ".." are not file names either, since saving under them would
// point outside the asset directory.
//
// A lone trailing '?' is dropped. Anything after a '?' that is not at the
// very end stays part of the name.
pub fn derive_filename(url: &str) -> Option<&str> {
    let url = url.strip_suffix('/').unwrap_or(url);
    let url = url.strip_prefix("https://").unwrap_or(url);

    // Everything after the last '/'; no '/' means we only have a host
    let name = &url[url.rfind('/')? + 1..];
    let name = name.strip_suffix('?').unwrap_or(name);

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_segment() {
        assert_eq!(
            derive_filename("https://cdn.example.test/base/img.png"),
            Some("img.png")
        );
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        assert_eq!(
            derive_filename("https://cdn.example.test/base/video.mp4/"),
            Some("video.mp4")
        );
    }

    #[test]
    fn test_host_only_has_no_filename() {
        assert_eq!(derive_filename("https://cdn.example.test"), None);
        assert_eq!(derive_filename("https://cdn.example.test/"), None);
    }

    #[test]
    fn test_empty_last_segment_has_no_filename() {
        assert_eq!(derive_filename("https://cdn.example.test/a//"), None);
    }

    #[test]
    fn test_dot_segments_have_no_filename() {
        assert_eq!(derive_filename("https://cdn.example.test/x/.."), None);
        assert_eq!(derive_filename("https://cdn.example.test/x/./"), None);
        assert_eq!(derive_filename("https://cdn.example.test/x/..?"), None);
    }

    #[test]
    fn test_bare_trailing_query_marker_is_stripped() {
        assert_eq!(
            derive_filename("https://cdn.example.test/x/img.png?"),
            Some("img.png")
        );
    }

    #[test]
    fn test_query_parameters_are_kept() {
        assert_eq!(
            derive_filename("https://cdn.example.test/x/img.png?ex=1"),
            Some("img.png?ex=1")
        );
    }
}
