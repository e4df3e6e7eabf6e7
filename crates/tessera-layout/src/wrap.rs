//! Line wrapping for fixed-width text.
//!
//! Widths count `char`s; every character is assumed to occupy one cell.

/// Break `text` into lines of at most `width` characters.
///
/// A `\n` ends the current line. A line that reaches `width` characters is
/// emitted immediately. The trailing line is always emitted, so empty input
/// gives one empty line. A `width` of zero is treated as one.
#[must_use]
pub fn soft_wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0;

    for c in text.chars() {
        if c == '\n' {
            lines.push(std::mem::take(&mut line));
            len = 0;
        } else {
            line.push(c);
            len += 1;
        }

        if len == width {
            lines.push(std::mem::take(&mut line));
            len = 0;
        }
    }

    lines.push(line);
    lines
}

/// Split `text` on `\n` and cut every line to `width` characters.
#[must_use]
pub fn hard_wrap(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .map(|line| line.chars().take(width).collect())
        .collect()
}
