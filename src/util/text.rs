use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns (CJK and emoji count as 2).
///
/// ```
/// use newsfeed::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates a string to at most `max_width` terminal columns.
///
/// When truncation is needed and there is room for it, the result ends in
/// `"..."`. Widths of 3 or less get as many whole characters as fit, with no
/// ellipsis. Returns `Cow::Borrowed` when the string already fits.
///
/// ```
/// use newsfeed::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width > ELLIPSIS_WIDTH {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    } else {
        (max_width, "")
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

fn is_unsafe_byte(b: u8) -> bool {
    b == 0x1b || b == 0x7f || b < 0x20
}

/// Flattens remote text to one terminal-safe line.
///
/// Feed titles and section names come from a remote API and are printed
/// straight to the terminal, so:
/// - ANSI CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ESC \`) sequences are dropped
/// - other C0 controls and DEL are dropped
/// - tab, newline and carriage return become a single space each
///
/// Returns `Cow::Borrowed` when there is nothing to strip.
pub fn sanitize_line(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().copied().any(is_unsafe_byte) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b if bytes.get(i + 1) == Some(&b'[') => {
                i += 2;
                while i < bytes.len() {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            }
            0x1b if bytes.get(i + 1) == Some(&b']') => {
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b'\t' | b'\n' | b'\r' => {
                out.push(' ');
                i += 1;
            }
            b if is_unsafe_byte(b) => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && !is_unsafe_byte(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes stop the run, so the slice stays on char boundaries.
                out.push_str(&s[start..i]);
            }
        }
    }

    Cow::Owned(out)
}
