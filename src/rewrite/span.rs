// src/rewrite/span.rs
// =============================================================================
// This module finds a CDN URL inside one line of text.
//
// URLs show up wrapped in all sorts of things:
// - Markdown:   ![logo](https://cdn.../logo.png "title")
// - HTML/JSON:  src="https://cdn.../logo.png"
// - Plain text: see https://cdn.../logo.png for details
//
// Instead of parsing each format we look at the character just before the
// URL (the "opening delimiter") and end the URL at whichever comes first:
// the same delimiter again, a space, or a closing parenthesis.
//
// All offsets are byte offsets into the line and always sit on character
// boundaries, so slicing with them is safe.
// =============================================================================

/// A qualifying URL found in a line, with the byte range it occupies.
///
/// `start < end <= line.len()` always holds, and the character before
/// `start` (if any) is not alphanumeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlSpan<'a> {
    pub url: &'a str,
    pub start: usize,
    pub end: usize,
}

// Finds the first URL in `line` that begins with `origin`
//
// Returns None when:
// - the origin does not appear in the line at all
// - the origin is glued to a letter or digit (e.g. "xhttps://cdn...")
//
// Only the first occurrence is considered. If it is rejected we do not go
// looking for a second one further along the line.
pub fn extract_url<'a>(line: &'a str, origin: &str) -> Option<UrlSpan<'a>> {
    if origin.is_empty() {
        return None;
    }

    let start = line.find(origin)?;

    // At offset 0 there is nothing before the URL, so there is no opening
    // delimiter to look for and the match is accepted as is.
    let delimiter = match line[..start].chars().next_back() {
        Some(c) if c.is_alphanumeric() => return None,
        Some(c) => Some(c),
        None => None,
    };

    let rest = &line[start..];

    // Closest of: the opening delimiter again, a space, a ')'
    // Missing terminators simply drop out of the min()
    let end = [delimiter, Some(' '), Some(')')]
        .into_iter()
        .flatten()
        .filter_map(|terminator| rest.find(terminator))
        .min()
        .map(|offset| start + offset)
        .unwrap_or_else(|| last_char_offset(line));

    Some(UrlSpan {
        url: &line[start..end],
        start,
        end,
    })
}

// Byte offset of the last character in the line.
//
// Lines keep their '\n', so for a normal line this stops the URL right
// before the newline.
fn last_char_offset(line: &str) -> usize {
    line.char_indices()
        .next_back()
        .map(|(offset, _)| offset)
        .unwrap_or(0)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why return a struct holding &'a str instead of a String?
//    - The URL is just a slice of the line, so nothing is copied
//    - The 'a lifetime says the span cannot outlive the line it points into
//
// 2. What does chars().next_back() do?
//    - Gets the last character of a string slice
//    - line[..start] is everything before the URL, so this is the
//      character right before it (handles multi-byte characters correctly)
//
// 3. What is flatten() doing on [Option<char>; 3]?
//    - It drops the None entries and unwraps the Some ones
//    - That's how a missing opening delimiter just disappears from the search
// -----------------------------------------------------------------------------
