use crate::path_utils::split_extension;

/// Marker appended by [`elide`].
pub const ELLIPSIS: char = '…';

/// Marker inserted by [`truncate_middle`].
pub const MIDDLE_MARKER: &str = "...";

/// Cut `text` to at most `max_len` characters, ending in a single `…`.
///
/// Lengths are counted in chars, not bytes.
pub fn elide(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// Shorten a filename by dropping the middle of its stem, keeping the
/// extension intact: `"holiday_photo_0001.jpeg"` -> `"holi...001.jpeg"`.
///
/// The result is never longer than `max_len` chars. When the extension is
/// too long to leave room for any of the stem, the whole name is cut in the
/// middle instead.
pub fn truncate_middle(filename: &str, max_len: usize) -> String {
    let total = filename.chars().count();
    if total <= max_len {
        return filename.to_string();
    }

    let marker_len = MIDDLE_MARKER.chars().count();
    if max_len <= marker_len {
        return filename.chars().take(max_len).collect();
    }

    if let (stem, Some(ext)) = split_extension(filename) {
        let suffix_len = ext.chars().count() + 1;
        if let Some(room) = max_len
            .checked_sub(marker_len + suffix_len)
            .filter(|&r| r > 0)
        {
            let mut out = cut_middle(stem, room);
            out.push('.');
            out.push_str(ext);
            return out;
        }
    }

    cut_middle(filename, max_len - marker_len)
}

// Keep `keep` chars of `s` around the marker, the extra one going to the head.
fn cut_middle(s: &str, keep: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    let head = keep.div_ceil(2);
    let tail = keep / 2;

    let mut out: String = chars[..head].iter().collect();
    out.push_str(MIDDLE_MARKER);
    out.extend(&chars[chars.len() - tail..]);
    out
}
