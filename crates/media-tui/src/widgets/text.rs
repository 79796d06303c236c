//! Display-width aware padding and truncation for column layouts.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// `s` cut or padded to exactly `width` terminal columns. Cut text ends
/// in `…`.
pub fn fit(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let w = s.width();
    if w <= width {
        let mut out = String::with_capacity(s.len() + width - w);
        out.push_str(s);
        out.extend(std::iter::repeat(' ').take(width - w));
        return out;
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > width - 1 {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out.push('…');
    used += 1;
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

/// Like `fit`, but right-aligned (for numbers).
pub fn fit_right(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        return fit(s, width);
    }
    format!("{}{}", " ".repeat(width - w), s)
}
