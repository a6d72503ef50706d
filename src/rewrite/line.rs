// src/rewrite/line.rs
// =============================================================================
// Replaces a URL span inside a line with a local reference.
//
// Everything outside the span is copied through untouched, including the
// quotes/parentheses around the URL and the line terminator.
// =============================================================================

/// Builds the path written into the file for a saved asset
///
/// Markdown files get the asset directory in front (`public/logo.png`),
/// everything else just the file name. The leading '/' is added by
/// [`rewrite_line`].
pub fn local_reference(filename: &str, asset_dir: &str, prefix_with_asset_dir: bool) -> String {
    if prefix_with_asset_dir {
        format!("{}/{}", asset_dir, filename)
    } else {
        filename.to_string()
    }
}

// Returns `line` with `line[start..end]` replaced by "/" + reference
//
// The reference is inserted as is. A reference that itself contains quotes
// or parentheses can produce a line that no longer parses in its original
// format.
pub fn rewrite_line(line: &str, reference: &str, start: usize, end: usize) -> String {
    let mut rewritten = String::with_capacity(line.len() - (end - start) + reference.len() + 1);
    rewritten.push_str(&line[..start]);
    rewritten.push('/');
    rewritten.push_str(reference);
    rewritten.push_str(&line[end..]);
    rewritten
}
