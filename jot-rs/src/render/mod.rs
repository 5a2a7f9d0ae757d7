//! Fixed-width listing renderer.
//!
//! A row is built from typed fields first and laid out in plain text; color
//! is applied per field afterwards. Layout of a row:
//!
//! ```text
//! +------------+-----+------+--------------------------------------------------+
//! |    Date    | Sts |   ID | Note                                             |
//! +------------+-----+------+--------------------------------------------------+
//! | 2024-05-01 | [ ] |    1 | Buy milk                                         |
//! |            |  -  |    2 | -> Buy eggs                                      +
//! +------------+-----+------+--------------------------------------------------+
//! ```
//!
//! The last character is the summary marker: `|` fits, `~` truncated,
//! `+` multi-line, `&` multi-line and truncated, `:` search context.

pub mod highlight;
pub mod style;

use crate::error::Result;
use crate::types::{DATE_FMT, Generation, Note, TIMESTAMP_FMT};
use highlight::{Matcher, context_window, fit_prefix, text_width, upper_range};
use std::ops::Range;
use style::{Palette, paint};

const DATE_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 3;
const ID_WIDTH: usize = 4;

/// Trailing marker describing how the summary relates to the full note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Fits,
    Truncated,
    MultiLine,
    MultiLineTruncated,
    Context,
}

impl Marker {
    pub fn new(multiline: bool, truncated: bool) -> Self {
        match (multiline, truncated) {
            (true, true) => Marker::MultiLineTruncated,
            (false, true) => Marker::Truncated,
            (true, false) => Marker::MultiLine,
            (false, false) => Marker::Fits,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Marker::Fits => '|',
            Marker::Truncated => '~',
            Marker::MultiLine => '+',
            Marker::MultiLineTruncated => '&',
            Marker::Context => ':',
        }
    }
}

/// The typed fields of one rendered row, before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFields {
    pub date: String,
    pub glyph: String,
    pub id: String,
    pub indicator: String,
    pub text: String,
    /// Char range of a search match inside `text`.
    pub hit: Option<Range<usize>>,
    pub marker: Marker,
}

impl RowFields {
    fn blank(text: String, hit: Range<usize>) -> Self {
        Self {
            date: String::new(),
            glyph: String::new(),
            id: String::new(),
            indicator: String::new(),
            text,
            hit: Some(hit),
            marker: Marker::Context,
        }
    }
}

/// Generation indicator prefixed to the summary: nothing at the top level,
/// `> `, `-> `, `--> ` ... for descendants, `? ` for unresolved notes.
pub fn generation_indicator(generation: Generation) -> String {
    match generation {
        Generation::Depth(0) => String::new(),
        Generation::Depth(depth) => format!("{}> ", "-".repeat(depth - 1)),
        Generation::Unresolved => "? ".to_string(),
    }
}

/// Formats notes into fixed-width rows.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: usize,
    palette: Option<Palette>,
}

impl Renderer {
    pub fn new(width: usize, colorize: bool) -> Self {
        Self {
            width: width.max(1),
            palette: colorize.then(Palette::classic),
        }
    }

    /// Border line above and below a listing.
    pub fn border(&self) -> String {
        let line = format!(
            "+{}+{}+{}+{}+",
            "-".repeat(DATE_WIDTH + 2),
            "-".repeat(STATUS_WIDTH + 2),
            "-".repeat(ID_WIDTH + 2),
            "-".repeat(self.width + 2)
        );
        paint(&line, self.palette.map(|p| p.frame))
    }

    /// Column titles.
    pub fn column_header(&self) -> String {
        self.layout(&RowFields {
            date: "Date".to_string(),
            glyph: "Sts".to_string(),
            id: "ID".to_string(),
            indicator: String::new(),
            text: "Note".to_string(),
            hit: None,
            marker: Marker::Fits,
        })
    }

    /// Border, column titles, border.
    pub fn header(&self) -> String {
        format!("{}\n{}\n{}", self.border(), self.column_header(), self.border())
    }

    pub fn footer(&self) -> String {
        self.border()
    }

    /// Render one note: its summary row, plus a context row for every
    /// matching line whose match the summary does not show.
    pub fn format_row(
        &self,
        note: &Note,
        generation: Generation,
        search: Option<&str>,
    ) -> Result<String> {
        let matcher = search.map(Matcher::new).transpose()?;
        Ok(self.rows(note, generation, matcher.as_ref()).join("\n"))
    }

    /// A complete listing, header and footer included even when empty.
    pub fn listing<'a, I>(&self, entries: I, search: Option<&str>) -> Result<String>
    where
        I: IntoIterator<Item = (&'a Note, Generation)>,
    {
        let matcher = search.map(Matcher::new).transpose()?;
        let mut lines = vec![self.header()];
        for (note, generation) in entries {
            lines.extend(self.rows(note, generation, matcher.as_ref()));
        }
        lines.push(self.footer());
        Ok(lines.join("\n"))
    }

    /// Full single-note page: timestamps, the summary table, then the body.
    pub fn detail(&self, note: &Note) -> String {
        let created = note.created_at.format(TIMESTAMP_FMT).to_string();
        let modified = note.modified_at.format(TIMESTAMP_FMT).to_string();
        let (created_style, modified_style) = match self.palette {
            Some(p) => (Some(p.created), Some(p.modified)),
            None => (None, None),
        };

        let labels = format!(
            " {}{}",
            paint(&format!("{:<21}", "Created"), created_style),
            paint(&format!("{:<21}", "Modified"), modified_style)
        );
        let stamps = format!(
            " {}{}",
            paint(&format!("{:^21}", created), created_style.map(|s| s.invert())),
            paint(&format!("{:^21}", modified), modified_style.map(|s| s.invert()))
        );

        let rows = self.rows(note, Generation::TOP, None).join("\n");
        format!(
            "{}\n{}\n\n{}\n{}\n{}\n\n{}\n",
            labels,
            stamps,
            self.header(),
            rows,
            self.footer(),
            note.description
        )
    }

    /// Typed fields for a note's rows.
    pub fn row_fields(
        &self,
        note: &Note,
        generation: Generation,
        matcher: Option<&Matcher>,
    ) -> Vec<RowFields> {
        let indicator: String = generation_indicator(generation)
            .chars()
            .take(self.width)
            .collect();
        let room = self.width.saturating_sub(text_width(&indicator));

        let first_chars: Vec<char> = note.summary_line().chars().collect();
        let fit = fit_prefix(&first_chars, room);
        let truncated = fit < first_chars.len();
        let shown = &first_chars[..fit];

        let mut summary = RowFields {
            date: note
                .due
                .map(|d| d.format(DATE_FMT).to_string())
                .unwrap_or_default(),
            glyph: note
                .glyph
                .as_deref()
                .unwrap_or("")
                .chars()
                .take(STATUS_WIDTH)
                .collect(),
            id: note.id.to_string(),
            indicator,
            text: shown.iter().collect(),
            hit: None,
            marker: Marker::new(note.is_multiline(), truncated),
        };

        let Some(matcher) = matcher else {
            return vec![summary];
        };

        let mut context = Vec::new();
        for (index, line) in note.description.lines().enumerate() {
            let Some(hit) = matcher.find(line) else {
                continue;
            };
            if index == 0 && hit.end <= shown.len() {
                summary.text = upper_range(shown, hit.clone());
                summary.hit = Some(hit);
                continue;
            }
            let window = context_window(line, hit, self.width);
            context.push(RowFields::blank(window.text, window.hit));
        }

        let mut rows = vec![summary];
        rows.extend(context);
        rows
    }

    fn rows(&self, note: &Note, generation: Generation, matcher: Option<&Matcher>) -> Vec<String> {
        self.row_fields(note, generation, matcher)
            .iter()
            .map(|fields| self.layout(fields))
            .collect()
    }

    /// Lay out fields into a fixed-width line, styling each field.
    pub fn layout(&self, fields: &RowFields) -> String {
        let p = self.palette;
        let frame = |s: &str| paint(s, p.map(|p| p.frame));

        let used = text_width(&fields.indicator) + text_width(&fields.text);
        let pad = " ".repeat(self.width.saturating_sub(used));

        let text_chars: Vec<char> = fields.text.chars().collect();
        let text = match &fields.hit {
            Some(hit) if p.is_some() => {
                let hit = hit.start.min(text_chars.len())..hit.end.min(text_chars.len());
                let before: String = text_chars[..hit.start].iter().collect();
                let matched: String = text_chars[hit.clone()].iter().collect();
                let after: String = text_chars[hit.end..].iter().collect();
                format!(
                    "{}{}{}",
                    paint(&before, p.map(|p| p.note)),
                    paint(&matched, p.map(|p| p.highlight)),
                    paint(&after, p.map(|p| p.note))
                )
            }
            _ => paint(&fields.text, p.map(|p| p.note)),
        };

        let mut line = String::new();
        line.push_str(&frame("| "));
        line.push_str(&paint(
            &format!("{:^width$}", fields.date, width = DATE_WIDTH),
            p.map(|p| p.date),
        ));
        line.push_str(&frame(" | "));
        line.push_str(&paint(
            &format!("{:^width$}", fields.glyph, width = STATUS_WIDTH),
            p.map(|p| p.status),
        ));
        line.push_str(&frame(" | "));
        line.push_str(&paint(
            &format!("{:>width$}", fields.id, width = ID_WIDTH),
            p.map(|p| p.id),
        ));
        line.push_str(&frame(" | "));
        line.push_str(&paint(&fields.indicator, p.map(|p| p.indicator)));
        line.push_str(&text);
        line.push_str(&paint(&pad, p.map(|p| p.note)));
        line.push_str(&frame(" "));
        line.push_str(&paint(&fields.marker.as_char().to_string(), p.map(|p| p.marker)));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn note(id: i64, description: &str) -> Note {
        let stamp = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        Note {
            id,
            status_id: 2,
            glyph: Some("[ ]".to_string()),
            due: None,
            description: description.to_string(),
            created_at: stamp,
            modified_at: stamp,
        }
    }

    fn marker_of(line: &str) -> char {
        line.chars().last().unwrap()
    }

    #[test]
    fn test_generation_indicator() {
        assert_eq!(generation_indicator(Generation::TOP), "");
        assert_eq!(generation_indicator(Generation::Depth(1)), "> ");
        assert_eq!(generation_indicator(Generation::Depth(3)), "--> ");
        assert_eq!(generation_indicator(Generation::Unresolved), "? ");
    }

    #[test]
    fn test_row_layout_plain() {
        let r = Renderer::new(10, false);
        let mut n = note(7, "Buy milk");
        n.due = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(
            r.format_row(&n, Generation::TOP, None).unwrap(),
            "| 2024-05-01 | [ ] |    7 | Buy milk   |"
        );
    }

    #[test]
    fn test_rows_align_with_border_and_header() {
        let r = Renderer::new(12, false);
        let row = r.format_row(&note(1, "x"), Generation::Depth(2), None).unwrap();
        assert_eq!(r.border().chars().count(), row.chars().count());
        assert_eq!(r.column_header().chars().count(), row.chars().count());
        assert_eq!(r.column_header(), "|    Date    | Sts |   ID | Note         |");
    }

    #[test]
    fn test_summary_markers() {
        let r = Renderer::new(10, false);
        let fits = r.format_row(&note(1, "abcdefghij"), Generation::TOP, None).unwrap();
        let over = r.format_row(&note(1, "abcdefghijk"), Generation::TOP, None).unwrap();
        let multi = r.format_row(&note(1, "abc\ndef"), Generation::TOP, None).unwrap();
        let both = r
            .format_row(&note(1, "abcdefghijk\nmore"), Generation::TOP, None)
            .unwrap();

        assert_eq!(marker_of(&fits), '|');
        assert_eq!(marker_of(&over), '~');
        assert_eq!(marker_of(&multi), '+');
        assert_eq!(marker_of(&both), '&');
        assert!(over.contains("abcdefghij ~"));
        assert!(!multi.contains("def"));
    }

    #[test]
    fn test_trailing_newline_marks_multiline() {
        let r = Renderer::new(10, false);
        let row = r.format_row(&note(1, "abc\n"), Generation::TOP, None).unwrap();
        assert_eq!(marker_of(&row), '+');
        assert!(row.ends_with("| abc        +"));
    }

    #[test]
    fn test_indicator_counts_toward_width() {
        let r = Renderer::new(10, false);
        // "> " + 8 chars fits exactly, one more is truncated
        let fits = r.format_row(&note(1, "abcdefgh"), Generation::Depth(1), None).unwrap();
        let over = r.format_row(&note(1, "abcdefghi"), Generation::Depth(1), None).unwrap();
        assert!(fits.ends_with("> abcdefgh |"));
        assert!(over.ends_with("> abcdefgh ~"));
    }

    #[test]
    fn test_wide_characters_keep_alignment() {
        use unicode_width::UnicodeWidthStr;

        let r = Renderer::new(10, false);
        let over = r.format_row(&note(1, "日本語のメモ"), Generation::TOP, None).unwrap();
        let short = r.format_row(&note(2, "日本語"), Generation::TOP, None).unwrap();

        assert_eq!(over.width(), r.border().width());
        assert_eq!(short.width(), r.border().width());
        assert!(over.ends_with("| 日本語のメ ~"));
        assert!(short.ends_with("| 日本語     |"));
    }

    #[test]
    fn test_missing_glyph_renders_blank() {
        let r = Renderer::new(10, false);
        let mut n = note(3, "odd");
        n.glyph = None;
        assert!(r.format_row(&n, Generation::TOP, None).unwrap().starts_with("|            |     |    3 |"));
    }

    #[test]
    fn test_unresolved_marker() {
        let r = Renderer::new(10, false);
        let row = r.format_row(&note(1, "loop"), Generation::Unresolved, None).unwrap();
        assert!(row.contains("| ? loop"));
    }

    #[test]
    fn test_search_highlights_summary_in_place() {
        let r = Renderer::new(20, false);
        let row = r.format_row(&note(1, "buy milk today"), Generation::TOP, Some("Milk")).unwrap();
        assert_eq!(row.lines().count(), 1);
        assert!(row.contains("buy MILK today"));
    }

    #[test]
    fn test_search_adds_context_rows() {
        let r = Renderer::new(10, false);
        let n = note(4, "shopping\nfirst some bread then the milk and eggs\nno match\nmilk");
        let out = r.format_row(&n, Generation::TOP, Some("milk")).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("shopping"));
        assert_eq!(lines[1], "|            |     |      | he MILK an :");
        assert_eq!(lines[2], "|            |     |      | MILK       :");
        for line in &lines {
            assert_eq!(line.chars().count(), lines[0].chars().count());
        }
    }

    #[test]
    fn test_search_match_beyond_truncation_gets_context_row() {
        let r = Renderer::new(10, false);
        let n = note(1, "a very long first line with milk");
        let out = r.format_row(&n, Generation::TOP, Some("milk")).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("MILK"));
    }

    #[test]
    fn test_empty_listing_has_header_and_footer() {
        let r = Renderer::new(10, false);
        let out = r.listing(std::iter::empty(), None).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], r.border());
        assert_eq!(lines[1], r.column_header());
        assert_eq!(lines[3], r.border());
    }

    #[test]
    fn test_color_keeps_plain_content() {
        let plain = Renderer::new(16, false);
        let colored = Renderer::new(16, true);
        let n = note(9, "colored note\nwith body");
        let a = plain.format_row(&n, Generation::Depth(2), Some("note")).unwrap();
        let b = colored.format_row(&n, Generation::Depth(2), Some("note")).unwrap();
        assert_ne!(a, b);
        assert_eq!(strip_ansi(&b), a);
    }

    #[test]
    fn test_detail_page() {
        let r = Renderer::new(10, false);
        let page = r.detail(&note(5, "title\nbody text"));
        assert!(page.contains("Created"));
        assert!(page.contains("2024-01-02 03:04:05"));
        assert!(page.contains("|    5 | title      +"));
        assert!(page.ends_with("title\nbody text\n"));
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for next in chars.by_ref() {
                    if next == 'm' {
                        break;
                    }
                }
                continue;
            }
            out.push(c);
        }
        out
    }
}
