//! Search-term matching and context windows.
//!
//! Positions here are char indices; widths are terminal display columns, so
//! wide (CJK) characters count twice.

use regex::{Regex, RegexBuilder};
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Case-insensitive literal matcher for a search term.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Char range of the first match in `line`.
    pub fn find(&self, line: &str) -> Option<Range<usize>> {
        let m = self.regex.find(line)?;
        let start = line[..m.start()].chars().count();
        let len = m.as_str().chars().count();
        Some(start..start + len)
    }
}

/// A slice of a line sized to the summary column, with the match upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub text: String,
    /// Char range of the match inside `text`.
    pub hit: Range<usize>,
}

/// Display columns taken by `c`; control characters take none.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Display columns taken by `text`.
pub fn text_width(text: &str) -> usize {
    text.width()
}

/// Number of leading `chars` that fit in `width` columns.
pub fn fit_prefix(chars: &[char], width: usize) -> usize {
    let mut used = 0;
    for (i, &c) in chars.iter().enumerate() {
        used += char_width(c);
        if used > width {
            return i;
        }
    }
    chars.len()
}

/// Cut a window of at most `width` columns around `hit`, centering the match
/// where possible and sliding to stay inside the line near its ends.
pub fn context_window(line: &str, hit: Range<usize>, width: usize) -> Window {
    let chars: Vec<char> = line.chars().collect();
    let widths: Vec<usize> = chars.iter().map(|&c| char_width(c)).collect();
    let len = chars.len();
    let hit = hit.start.min(len)..hit.end.min(len);

    let (mut start, mut end) = (hit.start, hit.end);
    let mut used: usize = widths[start..end].iter().sum();
    while used > width && end > start + 1 {
        end -= 1;
        used -= widths[end];
    }

    // Grow on both sides in turn, the right side first, so an odd surplus
    // lands after the match.
    let mut take_right = true;
    loop {
        let left = start > 0 && used + widths[start - 1] <= width;
        let right = end < len && used + widths[end] <= width;
        let grow_right = match (left, right) {
            (false, false) => break,
            (true, false) => false,
            (false, true) => true,
            (true, true) => {
                take_right = !take_right;
                !take_right
            }
        };
        if grow_right {
            used += widths[end];
            end += 1;
        } else {
            start -= 1;
            used += widths[start];
        }
    }

    let hit_start = hit.start.clamp(start, end) - start;
    let hit_end = hit.end.clamp(start, end) - start;
    let text = upper_range(&chars[start..end], hit_start..hit_end);

    Window {
        text,
        hit: hit_start..hit_end,
    }
}

/// Collect `chars`, upper-casing those inside `range`. Chars whose upper
/// case form is longer than one char are kept as-is to hold the width.
pub fn upper_range(chars: &[char], range: Range<usize>) -> String {
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| if range.contains(&i) { upper_char(c) } else { c })
        .collect()
}

fn upper_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
